use crate::models::{DbSession, DbUser};
use chrono::{Duration, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Opaque bearer token: 32 random bytes, hex-encoded.
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub async fn create_session(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    ttl_days: i64,
) -> Result<DbSession> {
    let token = generate_token();
    let now = Utc::now();

    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, user_id, created_at, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING token, user_id, created_at, expires_at
        "#,
    )
    .bind(&token)
    .bind(user_id)
    .bind(now)
    .bind(now + Duration::days(ttl_days))
    .fetch_one(pool)
    .await?;

    tracing::debug!("Opened session for user {}", user_id);
    Ok(session)
}

/// Resolves a bearer token to its account. Unknown and expired tokens both
/// resolve to `None`.
pub async fn get_session_user(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT u.id, u.email, u.password_hash, u.name, u.subjects, u.created_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}
