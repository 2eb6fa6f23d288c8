use crate::models::DbUser;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::Utc;
use eyre::{eyre, Result};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Outcome of a registration attempt.
#[derive(Debug)]
pub enum CreateUserOutcome {
    Applied(DbUser),
    /// Another account already holds this email.
    EmailTaken,
}

pub async fn create_user(
    pool: &Pool<Postgres>,
    email: &str,
    password_hash: &str,
    name: &str,
    subjects: &[String],
) -> Result<CreateUserOutcome> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, email={}", id, email);

    let result = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, password_hash, name, subjects, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, email, password_hash, name, subjects, created_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(subjects)
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => Ok(CreateUserOutcome::Applied(user)),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Ok(CreateUserOutcome::EmailTaken)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, password_hash, name, subjects, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, password_hash, name, subjects, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Batch profile lookup for joining owner or requester names onto listings.
pub async fn get_users_by_ids(pool: &Pool<Postgres>, user_ids: &[Uuid]) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, password_hash, name, subjects, created_at
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Looks up the account and checks the password against the stored argon2
/// hash. Returns `None` both for an unknown email and a wrong password.
pub async fn verify_credentials(
    pool: &Pool<Postgres>,
    email: &str,
    password: &str,
) -> Result<Option<DbUser>> {
    let Some(user) = get_user_by_email(pool, email).await? else {
        return Ok(None);
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(is_valid.then_some(user))
}
