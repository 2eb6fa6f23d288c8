use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            name VARCHAR(255) NOT NULL,
            subjects TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(64) PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL REFERENCES users(id),
            day VARCHAR(16) NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            duration_minutes INTEGER NOT NULL,
            is_recurring BOOLEAN NOT NULL DEFAULT TRUE,
            status VARCHAR(16) NOT NULL DEFAULT 'available',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_slot_status
                CHECK (status IN ('available', 'booked', 'matched', 'blocked'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create match_requests table. slot_id carries no foreign key: a slot
    // can be deleted while requests against it are pending, and those
    // requests survive as dangling references until resolved.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS match_requests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_id UUID NOT NULL,
            slot_owner_id UUID NOT NULL REFERENCES users(id),
            requester_id UUID NOT NULL REFERENCES users(id),
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            slot_snapshot JSONB NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_request_status
                CHECK (status IN ('pending', 'accepted', 'rejected', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes. One statement per query; the prepared-statement
    // protocol rejects multi-statement strings.
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_slots_owner_id ON slots(owner_id)",
        "CREATE INDEX IF NOT EXISTS idx_slots_status ON slots(status)",
        "CREATE INDEX IF NOT EXISTS idx_match_requests_slot_id ON match_requests(slot_id)",
        "CREATE INDEX IF NOT EXISTS idx_match_requests_owner_status \
         ON match_requests(slot_owner_id, status)",
        "CREATE INDEX IF NOT EXISTS idx_match_requests_requester_id \
         ON match_requests(requester_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
