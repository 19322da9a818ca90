use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::orders::UpdateOrderStatusRequest,
    dto::owner::OwnerOrderList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::owner_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/owner/orders", get(list_all_orders))
        .route("/owner/orders/{id}/status", patch(override_order_status))
}

#[utoipa::path(
    get,
    path = "/api/owner/orders",
    responses(
        (status = 200, description = "All orders with merchant and buyer summaries", body = ApiResponse<OwnerOrderList>),
        (status = 403, description = "Caller is not a platform owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Owner"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OwnerOrderList>>> {
    let resp = owner_service::list_all_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/owner/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Override order status", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status or illegal transition"),
        (status = 403, description = "Caller is not a platform owner"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Owner"
)]
pub async fn override_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = owner_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
