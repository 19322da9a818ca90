//! The stock ledger: one quantity row per item, keyed by item id.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::stock::{SetStockRequest, StockList, StockListQuery, StockView},
    entity::stocks::{ActiveModel as StockActive, Column as StockCol, Entity as Stocks},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owns_item},
    models::Stock,
    response::{ApiResponse, Meta},
    services::catalog,
    state::AppState,
};

pub async fn check_available<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    requested: i32,
) -> AppResult<bool> {
    let stock = catalog::get_stock(conn, item_id).await?;
    Ok(stock.is_some_and(|s| s.quantity >= requested))
}

/// Conditional decrement: only touches the row when the remaining quantity
/// covers `qty`. Returns whether a row was updated, so the caller can
/// distinguish "decremented" from "missing or short". Run inside the order
/// transaction with the row already locked, this is the atomic
/// check-and-decrement that keeps quantity from ever going negative.
pub async fn decrement<C: ConnectionTrait>(conn: &C, item_id: Uuid, qty: i32) -> AppResult<bool> {
    let result = Stocks::update_many()
        .col_expr(StockCol::Quantity, Expr::col(StockCol::Quantity).sub(qty))
        .col_expr(StockCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(StockCol::ItemId.eq(item_id))
        .filter(StockCol::Quantity.gte(qty))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Full overwrite of an item's quantity, creating the row if absent.
pub async fn set_quantity<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    merchant_id: Uuid,
    quantity: i32,
    owner: Uuid,
) -> AppResult<Stock> {
    let existing = catalog::get_stock(conn, item_id).await?;
    let model = match existing {
        Some(stock) => {
            let mut active: StockActive = stock.into();
            active.merchant_id = Set(merchant_id);
            active.quantity = Set(quantity);
            active.user_id = Set(owner);
            active.updated_at = Set(Utc::now().into());
            active.update(conn).await?
        }
        None => {
            StockActive {
                item_id: Set(item_id),
                merchant_id: Set(merchant_id),
                quantity: Set(quantity),
                user_id: Set(owner),
                updated_at: NotSet,
            }
            .insert(conn)
            .await?
        }
    };
    Ok(model.into())
}

/// Called once when an item is created.
pub async fn initialize<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    merchant_id: Uuid,
    quantity: i32,
    owner: Uuid,
) -> AppResult<Stock> {
    set_quantity(conn, item_id, merchant_id, quantity, owner).await
}

pub async fn set_stock(
    state: &AppState,
    user: &AuthUser,
    payload: SetStockRequest,
) -> AppResult<ApiResponse<Stock>> {
    let (item_id, merchant_id, quantity) =
        match (payload.item_id, payload.merchant_id, payload.quantity) {
            (Some(item_id), Some(merchant_id), Some(quantity)) => (item_id, merchant_id, quantity),
            _ => return Err(AppError::Validation("Data stok tidak lengkap".into())),
        };
    if quantity < 0 {
        return Err(AppError::Validation("Stok tidak boleh negatif".into()));
    }

    let item = catalog::get_item(&state.orm, item_id).await?;
    let item = match item {
        Some(i) if i.merchant_id == merchant_id => i,
        _ => {
            return Err(AppError::NotFound(
                "Barang tidak ditemukan atau tidak terkait dengan merchant".into(),
            ));
        }
    };
    ensure_owns_item(
        &item,
        user.user_id,
        "Anda tidak memiliki akses untuk mengelola stok ini",
    )?;

    let stock = set_quantity(&state.orm, item_id, merchant_id, quantity, user.user_id).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "stock_set",
        "stocks",
        serde_json::json!({ "item_id": item_id, "quantity": quantity }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stok diperbarui",
        stock,
        Some(Meta::empty()),
    ))
}

pub async fn list_stock(
    state: &AppState,
    query: StockListQuery,
) -> AppResult<ApiResponse<StockList>> {
    let stocks = catalog::list_stocks(&state.orm, query.merchant_id).await?;

    let mut views = Vec::with_capacity(stocks.len());
    for stock in stocks {
        let item = catalog::get_item(&state.orm, stock.item_id).await?;
        views.push(StockView {
            item_id: stock.item_id,
            merchant_id: stock.merchant_id,
            quantity: stock.quantity,
            user_id: stock.user_id,
            updated_at: stock.updated_at.with_timezone(&chrono::Utc),
            item: item.map(Into::into),
        });
    }

    let total = views.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        StockList { items: views },
        Some(Meta::total(total)),
    ))
}
