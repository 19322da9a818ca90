//! Platform-owner endpoints: a role-gated view over every order, and a
//! status override that skips the merchant-ownership requirement (but not
//! the transition graph).

use sea_orm::{EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::UpdateOrderStatusRequest,
    dto::owner::{BuyerSummary, MerchantSummary, OwnerOrderList, OwnerOrderView},
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_role},
    models::Order,
    response::{ApiResponse, Meta},
    services::{catalog, order_service},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OwnerOrderList>> {
    ensure_owner_role(user)?;

    let orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        let merchant = catalog::get_merchant(&state.orm, order.merchant_id).await?;
        let buyer = catalog::get_user(&state.orm, order.user_id).await?;
        views.push(OwnerOrderView {
            order: order.into(),
            merchant: match merchant {
                Some(m) => MerchantSummary {
                    name: m.name,
                    category: m.category,
                },
                None => MerchantSummary {
                    name: "Unknown".into(),
                    category: "N/A".into(),
                },
            },
            user: match buyer {
                Some(u) => BuyerSummary {
                    name: u.name,
                    email: u.email,
                },
                None => BuyerSummary {
                    name: "Unknown".into(),
                    email: "N/A".into(),
                },
            },
        });
    }

    let total = views.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        OwnerOrderList { items: views },
        Some(Meta::total(total)),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_owner_role(user)?;

    let next = order_service::parse_status(payload.status.as_deref())?;

    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Pesanan tidak ditemukan".into()))?;

    let order = order_service::apply_status(&state.orm, order, next).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "owner_order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Status pesanan berhasil diperbarui",
        order.into(),
        Some(Meta::empty()),
    ))
}
