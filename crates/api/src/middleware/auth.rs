//! # Authentication Module
//!
//! This module provides authentication utilities for the PeerSlot API:
//! password hashing for account registration and the [`CurrentUser`]
//! extractor that resolves the `Authorization: Bearer` session token on
//! protected endpoints.
//!
//! Password hashing uses Argon2, a secure password hashing algorithm,
//! to protect user passwords from common attacks like rainbow tables
//! and brute force attempts.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use eyre::Result;
use peerslot_core::errors::SlotError;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::error_handling::AppError;
use crate::ApiState;

/// Hashes a password using the Argon2 algorithm
///
/// This function securely hashes passwords before storage in the database,
/// automatically generating a random salt and using industry-standard
/// parameters for Argon2.
///
/// # Arguments
///
/// * `password` - The plain text password to hash
///
/// # Returns
///
/// * `Result<String>` - The hashed password in PHC string format, or an error
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// The authenticated caller, resolved from the session token.
///
/// Handlers take this as an argument; there is no ambient current-user
/// state anywhere. Extraction fails with 401 when the header is missing,
/// malformed, or names an expired or unknown session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError(SlotError::Identity("Missing bearer token".to_string()))
        })?;

        let user = peerslot_db::repositories::session::get_session_user(&state.db_pool, token)
            .await
            .map_err(SlotError::Database)?
            .ok_or_else(|| {
                AppError(SlotError::Identity("Session expired or unknown".to_string()))
            })?;

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
        })
    }
}
