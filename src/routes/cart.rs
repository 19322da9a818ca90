use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList, UpdateCartRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartEntry,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart_list).post(add_to_cart))
        .route("/cart/{id}", put(update_cart_entry))
        .route("/cart/{id}", delete(remove_cart_entry))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "List cart entries with item and merchant", body = ApiResponse<CartList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::list_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add to cart", body = ApiResponse<CartEntry>),
        (status = 400, description = "Bad quantity or insufficient stock"),
        (status = 404, description = "Item missing or not under the merchant")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartEntry>>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/cart/{id}",
    params(("id" = Uuid, Path, description = "Cart entry ID")),
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Update cart entry", body = ApiResponse<CartEntry>),
        (status = 403, description = "Not the entry owner"),
        (status = 404, description = "Cart entry not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartEntry>>> {
    let resp = cart_service::update_cart_entry(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(("id" = Uuid, Path, description = "Cart entry ID")),
    responses(
        (status = 200, description = "Remove cart entry"),
        (status = 403, description = "Not the entry owner"),
        (status = 404, description = "Cart entry not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_cart_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_cart_entry(&state, &user, id).await?;
    Ok(Json(resp))
}
