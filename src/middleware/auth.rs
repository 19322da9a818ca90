use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::{carts, items, merchants},
    error::AppError,
    state::AppState,
};

/// The authenticated actor. The bearer token only carries the subject id;
/// the subject is resolved back through the users table on every request,
/// so the role always reflects the current account.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

/// Request context for endpoints that merely behave differently when a
/// valid token happens to be present. A bad token degrades to `Anonymous`.
#[derive(Debug, Clone)]
pub enum MaybeAuthUser {
    Anonymous,
    Authenticated(AuthUser),
}

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            MaybeAuthUser::Anonymous => None,
            MaybeAuthUser::Authenticated(user) => Some(user.user_id),
        }
    }
}

pub fn ensure_role(user: &AuthUser, role: &str, denied: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden(denied.to_string()));
    }
    Ok(())
}

pub fn ensure_owner_role(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(
        user,
        "owner",
        "Hanya pengguna dengan peran owner yang dapat mengakses data ini",
    )
}

pub fn ensure_owns_merchant(
    merchant: &merchants::Model,
    actor: Uuid,
    denied: &str,
) -> Result<(), AppError> {
    if merchant.user_id != actor {
        return Err(AppError::Forbidden(denied.to_string()));
    }
    Ok(())
}

pub fn ensure_owns_item(item: &items::Model, actor: Uuid, denied: &str) -> Result<(), AppError> {
    if item.user_id != actor {
        return Err(AppError::Forbidden(denied.to_string()));
    }
    Ok(())
}

pub fn ensure_owns_cart_entry(
    entry: &carts::Model,
    actor: Uuid,
    denied: &str,
) -> Result<(), AppError> {
    if entry.user_id != actor {
        return Err(AppError::Forbidden(denied.to_string()));
    }
    Ok(())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Token diperlukan".into()))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Token tidak valid".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Token tidak valid".into()))?;

        let row: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.pool)
            .await?;

        match row {
            Some((role,)) => Ok(AuthUser { user_id, role }),
            None => Err(AppError::Unauthorized("Token tidak valid".into())),
        }
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => MaybeAuthUser::Authenticated(user),
            Err(_) => MaybeAuthUser::Anonymous,
        })
    }
}
