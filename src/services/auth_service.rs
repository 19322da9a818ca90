use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};
use crate::dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest};

const USER_COLUMNS: &str = "id, email, name, address, phone_number, role, created_at";

pub async fn register_user(pool: &DbPool, payload: RegisterRequest) -> AppResult<ApiResponse<User>> {
    let (email, password, name, address, phone_number) = match (
        payload.email,
        payload.password,
        payload.name,
        payload.address,
        payload.phone_number,
    ) {
        (Some(e), Some(p), Some(n), Some(a), Some(ph))
            if !e.is_empty() && !p.is_empty() && !n.is_empty() && !a.is_empty() && !ph.is_empty() =>
        {
            (e, p, n, a, ph)
        }
        _ => {
            return Err(AppError::Validation(
                "Email, password, nama, alamat, dan nomor telepon wajib".into(),
            ));
        }
    };

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::Validation("Email sudah terdaftar".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let user: User = sqlx::query_as(&format!(
        "INSERT INTO users (id, email, password_hash, name, address, phone_number) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(email.as_str())
    .bind(password_hash)
    .bind(name)
    .bind(address)
    .bind(phone_number)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("User berhasil register", user, None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(AppError::Validation("Email dan password wajib".into())),
    };

    let row: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, password_hash FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&state.pool)
            .await?;

    let (user_id, stored_hash) = match row {
        Some(r) => r,
        None => return Err(AppError::Unauthorized("Email atau password salah".into())),
    };

    let parsed_hash = PasswordHash::new(&stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized("Email atau password salah".into()));
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(1))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user_id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user_id }),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Login berhasil",
        LoginResponse { token },
        Some(Meta::empty()),
    ))
}

pub async fn get_profile(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let profile: Option<User> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?;

    let profile = match profile {
        Some(p) => p,
        None => return Err(AppError::NotFound("Profil user tidak ditemukan".into())),
    };

    Ok(ApiResponse::success("OK", profile, None))
}
