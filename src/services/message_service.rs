use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::messages::{MerchantMessagesQuery, MessageList, MessageSender, MessageView, SendMessageRequest},
    entity::messages::{ActiveModel as MessageActive, Column as MessageCol, Entity as Messages},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Message,
    response::{ApiResponse, Meta},
    services::catalog,
    state::AppState,
};

pub async fn send_message(
    state: &AppState,
    user: &AuthUser,
    payload: SendMessageRequest,
) -> AppResult<ApiResponse<Message>> {
    let (merchant_id, body) = match (payload.merchant_id, payload.message) {
        (Some(m), Some(b)) if !b.is_empty() => (m, b),
        _ => return Err(AppError::Validation("merchantId dan pesan wajib".into())),
    };

    if catalog::get_merchant(&state.orm, merchant_id).await?.is_none() {
        return Err(AppError::NotFound("Toko tidak ditemukan".into()));
    }

    let message = MessageActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        merchant_id: Set(merchant_id),
        body: Set(body),
        status: Set("unread".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "message_send",
        "messages",
        serde_json::json!({ "merchant_id": merchant_id }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Pesan berhasil dikirim",
        message.into(),
        Some(Meta::empty()),
    ))
}

pub async fn merchant_messages(
    state: &AppState,
    user: &AuthUser,
    query: MerchantMessagesQuery,
) -> AppResult<ApiResponse<MessageList>> {
    let merchant_id = query
        .merchant_id
        .ok_or_else(|| AppError::Validation("merchantId wajib".into()))?;

    catalog::require_owned_merchant(&state.orm, merchant_id, user.user_id).await?;

    let messages = Messages::find()
        .filter(MessageCol::MerchantId.eq(merchant_id))
        .order_by_desc(MessageCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut views = Vec::with_capacity(messages.len());
    for message in messages {
        let sender = catalog::get_user(&state.orm, message.user_id).await?;
        let user = match sender {
            Some(u) => MessageSender {
                name: u.name,
                email: u.email,
            },
            None => MessageSender {
                name: "Unknown".into(),
                email: "N/A".into(),
            },
        };
        views.push(MessageView {
            message: message.into(),
            user,
        });
    }

    let total = views.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        MessageList { items: views },
        Some(Meta::total(total)),
    ))
}
