use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::items::{CreateItemInput, ItemList, ItemListQuery, UpdateItemInput},
    entity::{
        items::ActiveModel as ItemActive,
        Stocks,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, MaybeAuthUser, ensure_owns_item, ensure_owns_merchant},
    models::Item,
    response::{ApiResponse, Meta},
    services::{catalog, catalog::ItemFilter, stock_service},
    state::AppState,
};

pub async fn create_item(
    state: &AppState,
    user: &AuthUser,
    input: CreateItemInput,
) -> AppResult<ApiResponse<Item>> {
    let (merchant_id, name, category, base_price, quantity) = match (
        input.merchant_id,
        input.name,
        input.category,
        input.base_price,
        input.quantity,
    ) {
        (Some(m), Some(n), Some(c), Some(p), Some(q))
            if !m.is_empty() && !n.is_empty() && !c.is_empty() && !p.is_empty() && !q.is_empty() =>
        {
            (m, n, c, p, q)
        }
        _ => {
            return Err(AppError::Validation(
                "Data barang tidak lengkap, termasuk stok awal (quantity)".into(),
            ));
        }
    };

    let merchant_id = Uuid::parse_str(&merchant_id)
        .map_err(|_| AppError::Validation("merchantId tidak valid".into()))?;
    let initial_quantity: i32 = match quantity.parse() {
        Ok(q) if q >= 0 => q,
        _ => {
            return Err(AppError::Validation(
                "Stok awal harus berupa angka positif".into(),
            ));
        }
    };
    let base_price: i64 = match base_price.parse() {
        Ok(p) if p >= 0 => p,
        _ => return Err(AppError::Validation("Harga tidak valid".into())),
    };

    catalog::require_owned_merchant(&state.orm, merchant_id, user.user_id).await?;

    let photo_url = match input.photo {
        Some(photo) => {
            state
                .images
                .upload("pasarku/items", &photo.bytes, photo.content_type.as_deref())
                .await?
        }
        None => String::new(),
    };

    let txn = state.orm.begin().await?;

    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        merchant_id: Set(merchant_id),
        name: Set(name),
        category: Set(category),
        base_price: Set(base_price),
        photo_url: Set(photo_url),
        user_id: Set(user.user_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    stock_service::initialize(&txn, item.id, merchant_id, initial_quantity, user.user_id).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_create",
        "items",
        serde_json::json!({ "item_id": item.id, "quantity": initial_quantity }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Barang dan stok awal berhasil ditambahkan",
        item.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    input: UpdateItemInput,
) -> AppResult<ApiResponse<Item>> {
    let existing = catalog::get_item(&state.orm, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Barang tidak ditemukan".into()))?;

    // Ownership is checked before the payload, so a non-owner always sees
    // 403 no matter what they sent.
    ensure_owns_item(
        &existing,
        user.user_id,
        "Anda tidak memiliki akses untuk mengedit barang ini",
    )?;

    let (name, category, base_price) = match (input.name, input.category, input.base_price) {
        (Some(n), Some(c), Some(p)) if !n.is_empty() && !c.is_empty() && !p.is_empty() => (n, c, p),
        _ => return Err(AppError::Validation("Data barang tidak lengkap".into())),
    };
    let base_price: i64 = match base_price.parse() {
        Ok(p) if p >= 0 => p,
        _ => return Err(AppError::Validation("Harga tidak valid".into())),
    };

    let mut active: ItemActive = existing.into();
    active.name = Set(name);
    active.category = Set(category);
    active.base_price = Set(base_price);
    active.updated_at = Set(Utc::now().into());

    if let Some(photo) = input.photo {
        let url = state
            .images
            .upload("pasarku/items", &photo.bytes, photo.content_type.as_deref())
            .await?;
        active.photo_url = Set(url);
    }

    let item = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_update",
        "items",
        serde_json::json!({ "item_id": item.id }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Barang berhasil diperbarui",
        item.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = catalog::get_item(&state.orm, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Barang tidak ditemukan".into()))?;

    ensure_owns_item(
        &existing,
        user.user_id,
        "Anda tidak memiliki akses untuk menghapus barang ini",
    )?;

    // The stock row goes with the item.
    let txn = state.orm.begin().await?;
    Stocks::delete_by_id(id).exec(&txn).await?;
    crate::entity::Items::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_delete",
        "items",
        serde_json::json!({ "item_id": id }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Barang berhasil dihapus",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_items(
    state: &AppState,
    viewer: &MaybeAuthUser,
    query: ItemListQuery,
) -> AppResult<ApiResponse<ItemList>> {
    let merchant_id = query
        .merchant_id
        .ok_or_else(|| AppError::Validation("merchantId wajib".into()))?;

    let merchant = catalog::get_merchant(&state.orm, merchant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant tidak ditemukan".into()))?;

    let owner = match (query.owned, viewer.user_id()) {
        (Some(true), Some(user_id)) => {
            ensure_owns_merchant(&merchant, user_id, "Merchant bukan milik Anda")?;
            Some(user_id)
        }
        _ => None,
    };

    let items = catalog::list_items(&state.orm, ItemFilter { merchant_id, owner }).await?;

    let items: Vec<Item> = items.into_iter().map(Into::into).collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        ItemList { items },
        Some(Meta::total(total)),
    ))
}
