//! Guarded writes and reads for availability slots.
//!
//! Every write runs in a transaction that first takes a row lock on the
//! owner's `users` row. Writes for one owner therefore serialize, and the
//! slot snapshot the validator sees inside the transaction cannot go stale
//! before the write commits. Reads never lock.

use crate::models::DbSlot;
use chrono::Utc;
use eyre::Result;
use peerslot_core::models::slot::{Slot, SlotDraft, SlotPatch, SlotStatus};
use peerslot_core::rules;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

/// Outcome of a guarded slot write. Rule and state rejections are data, so
/// callers can map them onto their own error surface; infrastructure
/// failures stay in the `Result` error channel.
#[derive(Debug)]
pub enum SlotWriteOutcome {
    Applied(DbSlot),
    /// A business rule rejected the candidate; the message names the rule.
    Invalid(String),
    /// No slot with the given id.
    NotFound,
    /// The slot belongs to someone else.
    NotOwner,
    /// The slot is past its mutable state; carries the current status.
    NotAvailable(String),
}

async fn lock_owner(tx: &mut Transaction<'_, Postgres>, owner_id: Uuid) -> Result<()> {
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| eyre::eyre!("owner {owner_id} does not exist"))?;

    Ok(())
}

async fn slots_for_owner(tx: &mut Transaction<'_, Postgres>, owner_id: Uuid) -> Result<Vec<Slot>> {
    let rows = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, duration_minutes,
               is_recurring, status, created_at, updated_at
        FROM slots
        WHERE owner_id = $1
        "#,
    )
    .bind(owner_id)
    .fetch_all(&mut **tx)
    .await?;

    rows.into_iter().map(DbSlot::into_core).collect()
}

async fn fetch_slot(tx: &mut Transaction<'_, Postgres>, slot_id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, duration_minutes,
               is_recurring, status, created_at, updated_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(slot)
}

/// Creates a slot after re-validating the owner's full snapshot inside the
/// transaction that performs the insert.
pub async fn create_slot(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    draft: &SlotDraft,
    is_recurring: bool,
) -> Result<SlotWriteOutcome> {
    let mut tx = pool.begin().await?;
    lock_owner(&mut tx, owner_id).await?;

    let existing = slots_for_owner(&mut tx, owner_id).await?;
    let valid = match rules::validate_slot(draft, &existing) {
        Ok(valid) => valid,
        Err(err) => return Ok(SlotWriteOutcome::Invalid(err.message())),
    };

    let id = Uuid::new_v4();
    let now = Utc::now();

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (id, owner_id, day, start_time, end_time, duration_minutes,
                           is_recurring, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING id, owner_id, day, start_time, end_time, duration_minutes,
                  is_recurring, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(valid.day.as_str())
    .bind(&valid.start_time)
    .bind(&valid.end_time)
    .bind(valid.duration)
    .bind(is_recurring)
    .bind(SlotStatus::Available.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Created slot {} for owner {}", slot.id, owner_id);
    Ok(SlotWriteOutcome::Applied(slot))
}

/// Applies a partial edit. The slot must exist, belong to `owner_id`, and
/// still be `available`; the merged result is re-validated against the
/// owner's other slots before the update is written.
pub async fn update_slot(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    owner_id: Uuid,
    patch: &SlotPatch,
) -> Result<SlotWriteOutcome> {
    let mut tx = pool.begin().await?;
    lock_owner(&mut tx, owner_id).await?;

    let Some(current) = fetch_slot(&mut tx, slot_id).await? else {
        return Ok(SlotWriteOutcome::NotFound);
    };

    if current.owner_id != owner_id {
        return Ok(SlotWriteOutcome::NotOwner);
    }

    if current.status != SlotStatus::Available.as_str() {
        return Ok(SlotWriteOutcome::NotAvailable(current.status));
    }

    let current_core = current.clone().into_core()?;
    let draft = patch.merged_draft(&current_core);

    let existing = slots_for_owner(&mut tx, owner_id).await?;
    let valid = match rules::validate_slot_update(&draft, &existing, slot_id) {
        Ok(valid) => valid,
        Err(err) => return Ok(SlotWriteOutcome::Invalid(err.message())),
    };

    let is_recurring = patch.is_recurring.unwrap_or(current.is_recurring);
    let now = Utc::now();

    let updated = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET day = $2, start_time = $3, end_time = $4, duration_minutes = $5,
            is_recurring = $6, updated_at = $7
        WHERE id = $1
        RETURNING id, owner_id, day, start_time, end_time, duration_minutes,
                  is_recurring, status, created_at, updated_at
        "#,
    )
    .bind(slot_id)
    .bind(valid.day.as_str())
    .bind(&valid.start_time)
    .bind(&valid.end_time)
    .bind(valid.duration)
    .bind(is_recurring)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Updated slot {} for owner {}", slot_id, owner_id);
    Ok(SlotWriteOutcome::Applied(updated))
}

/// Deletes a slot under the same guards as [`update_slot`]: it must exist,
/// belong to `owner_id`, and still be `available`. Pending match requests
/// against the slot stay behind as dangling references.
pub async fn delete_slot(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    owner_id: Uuid,
) -> Result<SlotWriteOutcome> {
    let mut tx = pool.begin().await?;
    lock_owner(&mut tx, owner_id).await?;

    let Some(current) = fetch_slot(&mut tx, slot_id).await? else {
        return Ok(SlotWriteOutcome::NotFound);
    };

    if current.owner_id != owner_id {
        return Ok(SlotWriteOutcome::NotOwner);
    }

    if current.status != SlotStatus::Available.as_str() {
        return Ok(SlotWriteOutcome::NotAvailable(current.status));
    }

    sqlx::query("DELETE FROM slots WHERE id = $1")
        .bind(slot_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!("Deleted slot {} for owner {}", slot_id, owner_id);
    Ok(SlotWriteOutcome::Applied(current))
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, duration_minutes,
               is_recurring, status, created_at, updated_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn list_slots_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, duration_minutes,
               is_recurring, status, created_at, updated_at
        FROM slots
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn list_slots_by_owner_and_status(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    status: SlotStatus,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, duration_minutes,
               is_recurring, status, created_at, updated_at
        FROM slots
        WHERE owner_id = $1 AND status = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Every `available` slot not owned by `exclude_owner`, for the peer
/// browser.
pub async fn list_open_slots(pool: &Pool<Postgres>, exclude_owner: Uuid) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, duration_minutes,
               is_recurring, status, created_at, updated_at
        FROM slots
        WHERE status = $1 AND owner_id <> $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(SlotStatus::Available.as_str())
    .bind(exclude_owner)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}
