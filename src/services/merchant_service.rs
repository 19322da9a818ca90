use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::merchants::{CreateMerchantInput, MerchantList, MerchantListQuery},
    entity::merchants::ActiveModel as MerchantActive,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::Merchant,
    response::{ApiResponse, Meta},
    services::catalog::{self, MerchantFilter},
    state::AppState,
};

pub async fn create_merchant(
    state: &AppState,
    user: &AuthUser,
    input: CreateMerchantInput,
) -> AppResult<ApiResponse<Merchant>> {
    let (name, category, lat, lng) = match (input.name, input.category, input.lat, input.lng) {
        (Some(name), Some(category), Some(lat), Some(lng))
            if !name.is_empty() && !category.is_empty() =>
        {
            (name, category, lat, lng)
        }
        _ => {
            return Err(AppError::Validation(
                "Nama, kategori, dan lokasi wajib".into(),
            ));
        }
    };

    let lat: f64 = lat
        .parse()
        .map_err(|_| AppError::Validation("Lokasi tidak valid".into()))?;
    let lng: f64 = lng
        .parse()
        .map_err(|_| AppError::Validation("Lokasi tidak valid".into()))?;

    let photo_url = match input.photo {
        Some(photo) => {
            state
                .images
                .upload("pasarku", &photo.bytes, photo.content_type.as_deref())
                .await?
        }
        None => String::new(),
    };

    let merchant = MerchantActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        category: Set(category),
        lat: Set(lat),
        lng: Set(lng),
        photo_url: Set(photo_url),
        norek: Set(input.norek.filter(|n| !n.is_empty())),
        user_id: Set(user.user_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "merchant_create",
        "merchants",
        serde_json::json!({ "merchant_id": merchant.id }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Toko Berhasil Ditambahkan",
        merchant.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_merchants(
    state: &AppState,
    viewer: &MaybeAuthUser,
    query: MerchantListQuery,
) -> AppResult<ApiResponse<MerchantList>> {
    // `owned` only narrows the listing when the caller is authenticated;
    // an anonymous caller just gets the public list.
    let owner = match (query.owned, viewer.user_id()) {
        (Some(true), Some(user_id)) => Some(user_id),
        _ => None,
    };

    let merchants = catalog::list_merchants(
        &state.orm,
        MerchantFilter {
            category: query.category.filter(|c| !c.is_empty()),
            owner,
        },
    )
    .await?;

    let items: Vec<Merchant> = merchants.into_iter().map(Into::into).collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        MerchantList { items },
        Some(Meta::total(total)),
    ))
}
