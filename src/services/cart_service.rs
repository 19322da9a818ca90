use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartEntryView, CartList, UpdateCartRequest},
    entity::carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owns_cart_entry},
    models::CartEntry,
    response::{ApiResponse, Meta},
    services::{catalog, stock_service},
    state::AppState,
};

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartEntry>> {
    let (merchant_id, item_id, quantity) =
        match (payload.merchant_id, payload.item_id, payload.quantity) {
            (Some(m), Some(i), Some(q)) => (m, i, q),
            _ => {
                return Err(AppError::Validation(
                    "merchantId, itemId, dan quantity wajib".into(),
                ));
            }
        };
    if quantity <= 0 {
        return Err(AppError::Validation(
            "Quantity harus berupa angka positif".into(),
        ));
    }

    let item = catalog::get_item(&state.orm, item_id).await?;
    if !item.is_some_and(|i| i.merchant_id == merchant_id) {
        return Err(AppError::NotFound(
            "Barang tidak ditemukan atau tidak terkait dengan merchant".into(),
        ));
    }

    if !stock_service::check_available(&state.orm, item_id, quantity).await? {
        return Err(AppError::Validation("Stok tidak cukup".into()));
    }

    let entry = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        merchant_id: Set(merchant_id),
        item_id: Set(item_id),
        quantity: Set(quantity),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        "carts",
        serde_json::json!({ "item_id": item_id, "quantity": quantity }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Barang berhasil ditambahkan ke keranjang",
        entry.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let entries = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?;

    // One lookup per referenced entity; a dangling reference shows up as null.
    let mut views = Vec::with_capacity(entries.len());
    for entry in entries {
        let item = catalog::get_item(&state.orm, entry.item_id).await?;
        let merchant = catalog::get_merchant(&state.orm, entry.merchant_id).await?;
        views.push(CartEntryView {
            entry: entry.into(),
            item: item.map(Into::into),
            merchant: merchant.map(Into::into),
        });
    }

    let total = views.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CartList { items: views },
        Some(Meta::total(total)),
    ))
}

pub async fn update_cart_entry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<CartEntry>> {
    let quantity = payload
        .quantity
        .ok_or_else(|| AppError::Validation("Quantity wajib diisi".into()))?;
    if quantity <= 0 {
        return Err(AppError::Validation(
            "Quantity harus berupa angka positif".into(),
        ));
    }

    let entry = Carts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Item keranjang tidak ditemukan".into()))?;
    ensure_owns_cart_entry(
        &entry,
        user.user_id,
        "Anda tidak memiliki akses untuk mengedit item ini",
    )?;

    let item_id = payload.item_id.unwrap_or(entry.item_id);
    let merchant_id = payload.merchant_id.unwrap_or(entry.merchant_id);

    if item_id != entry.item_id {
        let item = catalog::get_item(&state.orm, item_id).await?;
        if !item.is_some_and(|i| i.merchant_id == merchant_id) {
            return Err(AppError::NotFound(
                "Barang tidak ditemukan atau tidak terkait dengan merchant".into(),
            ));
        }
    } else if merchant_id != entry.merchant_id {
        let item = catalog::get_item(&state.orm, entry.item_id).await?;
        if !item.is_some_and(|i| i.merchant_id == merchant_id) {
            return Err(AppError::Validation(
                "Merchant tidak sesuai dengan barang".into(),
            ));
        }
    }

    if !stock_service::check_available(&state.orm, item_id, quantity).await? {
        return Err(AppError::Validation("Stok tidak cukup".into()));
    }

    let mut active: CartActive = entry.into();
    active.item_id = Set(item_id);
    active.merchant_id = Set(merchant_id);
    active.quantity = Set(quantity);
    active.updated_at = Set(Utc::now().into());
    let entry = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Item keranjang berhasil diperbarui",
        entry.into(),
        Some(Meta::empty()),
    ))
}

pub async fn remove_cart_entry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let entry = Carts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Item keranjang tidak ditemukan".into()))?;
    ensure_owns_cart_entry(
        &entry,
        user.user_id,
        "Anda tidak memiliki akses untuk menghapus item ini",
    )?;

    Carts::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        "carts",
        serde_json::json!({ "cart_id": id }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item keranjang berhasil dihapus",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
