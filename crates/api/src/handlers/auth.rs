use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use peerslot_core::errors::SlotError;
use peerslot_core::models::user::{
    AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, UserProfile,
};
use peerslot_db::repositories::user::CreateUserOutcome;
use std::sync::Arc;

use crate::middleware::auth::{self, CurrentUser};
use crate::middleware::error_handling::AppError;
use crate::ApiState;

const MIN_PASSWORD_LENGTH: usize = 6;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError(SlotError::Validation(
            "A valid email address is required".to_string(),
        )));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError(SlotError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ))));
    }

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError(SlotError::Validation("Name is required".to_string())));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let outcome = peerslot_db::repositories::user::create_user(
        &state.db_pool,
        &email,
        &password_hash,
        name,
        &payload.subjects,
    )
    .await
    .map_err(SlotError::Database)?;

    let user = match outcome {
        CreateUserOutcome::Applied(user) => user,
        CreateUserOutcome::EmailTaken => {
            return Err(AppError(SlotError::Conflict(
                "An account with this email already exists".to_string(),
            )));
        }
    };

    let session = peerslot_db::repositories::session::create_session(
        &state.db_pool,
        user.id,
        state.session_ttl_days,
    )
    .await
    .map_err(SlotError::Database)?;

    Ok(Json(AuthResponse {
        token: session.token,
        user: user.profile(),
    }))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();

    let user = peerslot_db::repositories::user::verify_credentials(
        &state.db_pool,
        &email,
        &payload.password,
    )
    .await
    .map_err(SlotError::Database)?
    .ok_or_else(|| AppError(SlotError::Identity("Invalid email or password".to_string())))?;

    let session = peerslot_db::repositories::session::create_session(
        &state.db_pool,
        user.id,
        state.session_ttl_days,
    )
    .await
    .map_err(SlotError::Database)?;

    Ok(Json(AuthResponse {
        token: session.token,
        user: user.profile(),
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AppError> {
    let token = auth::bearer_token(&headers)
        .ok_or_else(|| AppError(SlotError::Identity("Missing bearer token".to_string())))?;

    peerslot_db::repositories::session::delete_session(&state.db_pool, token)
        .await
        .map_err(SlotError::Database)?;

    Ok(Json(LogoutResponse { ok: true }))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = peerslot_db::repositories::user::get_user_by_id(&state.db_pool, user.id)
        .await
        .map_err(SlotError::Database)?
        .ok_or_else(|| SlotError::NotFound("Account no longer exists".to_string()))?;

    Ok(Json(user.profile()))
}
