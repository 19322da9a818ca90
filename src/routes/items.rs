use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::UploadedFile,
    dto::items::{CreateItemInput, ItemList, ItemListQuery, UpdateItemInput},
    error::AppResult,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::Item,
    response::ApiResponse,
    routes::multipart_error,
    services::item_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/item", post(create_item))
        .route("/item/{id}", put(update_item))
        .route("/item/{id}", delete(delete_item))
        .route("/items", get(list_items))
}

#[utoipa::path(
    post,
    path = "/api/item",
    responses(
        (status = 200, description = "Create item with initial stock", body = ApiResponse<Item>),
        (status = 403, description = "Merchant missing or not owned by caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Item>>> {
    let mut input = CreateItemInput::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "merchantId" => input.merchant_id = Some(field.text().await.map_err(multipart_error)?),
            "name" => input.name = Some(field.text().await.map_err(multipart_error)?),
            "category" => input.category = Some(field.text().await.map_err(multipart_error)?),
            "basePrice" => input.base_price = Some(field.text().await.map_err(multipart_error)?),
            "quantity" => input.quantity = Some(field.text().await.map_err(multipart_error)?),
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

    let resp = item_service::create_item(&state, &user, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/item/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Update item", body = ApiResponse<Item>),
        (status = 403, description = "Not the item owner"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Item>>> {
    let mut input = UpdateItemInput::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "name" => input.name = Some(field.text().await.map_err(multipart_error)?),
            "category" => input.category = Some(field.text().await.map_err(multipart_error)?),
            "basePrice" => input.base_price = Some(field.text().await.map_err(multipart_error)?),
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

    let resp = item_service::update_item(&state, &user, id, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/item/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Delete item and its stock"),
        (status = 403, description = "Not the item owner"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = item_service::delete_item(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/items",
    params(
        ("merchantId" = Uuid, Query, description = "Merchant ID (required)"),
        ("owned" = Option<bool>, Query, description = "Only the caller's items (needs auth)")
    ),
    responses(
        (status = 200, description = "List a merchant's items", body = ApiResponse<ItemList>),
        (status = 404, description = "Merchant not found")
    ),
    tag = "Items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(query): Query<ItemListQuery>,
) -> AppResult<Json<ApiResponse<ItemList>>> {
    let resp = item_service::list_items(&state, &viewer, query).await?;
    Ok(Json(resp))
}
