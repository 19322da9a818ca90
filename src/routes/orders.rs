use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::UploadedFile,
    dto::orders::{MerchantOrdersQuery, OrderList, PlaceOrderInput, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::multipart_error,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", get(list_my_orders).post(place_order))
        .route("/order/{id}/status", patch(update_order_status))
        .route("/merchant/orders", get(list_merchant_orders))
}

#[utoipa::path(
    post,
    path = "/api/order",
    responses(
        (status = 200, description = "Place an order", body = ApiResponse<Order>),
        (status = 400, description = "Invalid input or insufficient stock"),
        (status = 404, description = "Product or item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Order>>> {
    let mut input = PlaceOrderInput::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "merchantId" => input.merchant_id = Some(field.text().await.map_err(multipart_error)?),
            "itemId" => input.item_id = Some(field.text().await.map_err(multipart_error)?),
            "quantity" => input.quantity = Some(field.text().await.map_err(multipart_error)?),
            "deliveryMethod" => {
                input.delivery_method = Some(field.text().await.map_err(multipart_error)?)
            }
            "paymentMethod" => {
                input.payment_method = Some(field.text().await.map_err(multipart_error)?)
            }
            "address" => input.address = Some(field.text().await.map_err(multipart_error)?),
            "paymentProof" => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                input.payment_proof = Some(UploadedFile {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            _ => {}
        }
    }

    let resp = order_service::place_order(&state, &user, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/order", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_my_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchant/orders",
    params(("merchantId" = Uuid, Query, description = "Merchant ID (required)")),
    responses(
        (status = 200, description = "Orders placed with the caller's merchant", body = ApiResponse<OrderList>),
        (status = 403, description = "Merchant missing or not owned by caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_merchant_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MerchantOrdersQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_merchant_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/order/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status or illegal transition"),
        (status = 403, description = "Not the merchant owner"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
