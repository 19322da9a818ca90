use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::stock::{SetStockRequest, StockList, StockListQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Stock,
    response::ApiResponse,
    services::stock_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/stock", get(list_stock).post(set_stock))
}

#[utoipa::path(
    post,
    path = "/api/stock",
    request_body = SetStockRequest,
    responses(
        (status = 200, description = "Overwrite an item's stock", body = ApiResponse<Stock>),
        (status = 403, description = "Not the item owner"),
        (status = 404, description = "Item missing or not under the merchant")
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn set_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetStockRequest>,
) -> AppResult<Json<ApiResponse<Stock>>> {
    let resp = stock_service::set_stock(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stock",
    params(
        ("merchantId" = Option<Uuid>, Query, description = "Filter by merchant")
    ),
    responses(
        (status = 200, description = "List stock rows with their items", body = ApiResponse<StockList>)
    ),
    tag = "Stock"
)]
pub async fn list_stock(
    State(state): State<AppState>,
    Query(query): Query<StockListQuery>,
) -> AppResult<Json<ApiResponse<StockList>>> {
    let resp = stock_service::list_stock(&state, query).await?;
    Ok(Json(resp))
}
