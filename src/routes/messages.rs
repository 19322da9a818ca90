use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::messages::{MerchantMessagesQuery, MessageList, SendMessageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Message,
    response::ApiResponse,
    services::message_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-message", post(send_message))
        .route("/merchant/messages", get(merchant_messages))
}

#[utoipa::path(
    post,
    path = "/api/send-message",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Send a message to a merchant", body = ApiResponse<Message>),
        (status = 404, description = "Merchant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let resp = message_service::send_message(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/merchant/messages",
    params(("merchantId" = Uuid, Query, description = "Merchant ID (required)")),
    responses(
        (status = 200, description = "Messages sent to the caller's merchant", body = ApiResponse<MessageList>),
        (status = 403, description = "Merchant missing or not owned by caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn merchant_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MerchantMessagesQuery>,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let resp = message_service::merchant_messages(&state, &user, query).await?;
    Ok(Json(resp))
}
