use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    routing::{get, post},
};

use crate::{
    dto::UploadedFile,
    dto::merchants::{CreateMerchantInput, MerchantList, MerchantListQuery},
    error::AppResult,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::Merchant,
    response::ApiResponse,
    routes::multipart_error,
    services::merchant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/merchant", post(create_merchant))
        .route("/merchants", get(list_merchants))
}

#[utoipa::path(
    post,
    path = "/api/merchant",
    responses(
        (status = 200, description = "Create merchant", body = ApiResponse<Merchant>),
        (status = 400, description = "Missing name, category or location")
    ),
    security(("bearer_auth" = [])),
    tag = "Merchants"
)]
pub async fn create_merchant(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Merchant>>> {
    let mut input = CreateMerchantInput::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "name" => input.name = Some(field.text().await.map_err(multipart_error)?),
            "category" => input.category = Some(field.text().await.map_err(multipart_error)?),
            "lat" => input.lat = Some(field.text().await.map_err(multipart_error)?),
            "lng" => input.lng = Some(field.text().await.map_err(multipart_error)?),
            "norek" => input.norek = Some(field.text().await.map_err(multipart_error)?),
            "photo" => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                input.photo = Some(UploadedFile {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            _ => {}
        }
    }

    let resp = merchant_service::create_merchant(&state, &user, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchants",
    params(
        ("category" = Option<String>, Query, description = "Filter by merchant category"),
        ("owned" = Option<bool>, Query, description = "Only the caller's merchants (needs auth)")
    ),
    responses(
        (status = 200, description = "List merchants", body = ApiResponse<MerchantList>)
    ),
    tag = "Merchants"
)]
pub async fn list_merchants(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(query): Query<MerchantListQuery>,
) -> AppResult<Json<ApiResponse<MerchantList>>> {
    let resp = merchant_service::list_merchants(&state, &viewer, query).await?;
    Ok(Json(resp))
}
