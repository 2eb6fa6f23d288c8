//! Match request storage and the compare-and-set transitions that drive the
//! request lifecycle.

use crate::models::{DbMatchRequest, DbSlot};
use chrono::Utc;
use eyre::Result;
use peerslot_core::models::match_request::{RequestStatus, SlotSnapshot};
use peerslot_core::models::slot::SlotStatus;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Outcome of an attempted request creation.
#[derive(Debug)]
pub enum RequestCreateOutcome {
    Applied(DbMatchRequest),
    /// The referenced slot does not exist (any more).
    SlotNotFound,
    /// The slot exists but is not open for matching; carries its status.
    SlotNotAvailable(String),
    /// Requesters cannot claim their own slots.
    OwnSlot,
}

/// Outcome of a [`transition_request`] call. `Conflict` means a precondition
/// no longer held when the transaction looked; the rows are left exactly as
/// the earlier winner wrote them.
#[derive(Debug)]
pub enum TransitionOutcome {
    Applied(DbMatchRequest),
    Conflict(String),
    NotFound(String),
}

/// Creates a pending request against an open slot, snapshotting the slot's
/// schedule at this moment. The slot is re-checked inside the transaction.
pub async fn create_match_request(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    requester_id: Uuid,
) -> Result<RequestCreateOutcome> {
    let mut tx = pool.begin().await?;

    let Some(slot) = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, duration_minutes,
               is_recurring, status, created_at, updated_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(RequestCreateOutcome::SlotNotFound);
    };

    if slot.owner_id == requester_id {
        return Ok(RequestCreateOutcome::OwnSlot);
    }

    if slot.status != SlotStatus::Available.as_str() {
        return Ok(RequestCreateOutcome::SlotNotAvailable(slot.status));
    }

    let snapshot = SlotSnapshot {
        day: slot.day.parse()?,
        start_time: slot.start_time.clone(),
        end_time: slot.end_time.clone(),
        duration: slot.duration_minutes,
    };

    let id = Uuid::new_v4();
    let now = Utc::now();

    let request = sqlx::query_as::<_, DbMatchRequest>(
        r#"
        INSERT INTO match_requests (id, slot_id, slot_owner_id, requester_id, status,
                                    slot_snapshot, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING id, slot_id, slot_owner_id, requester_id, status, slot_snapshot,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(slot_id)
    .bind(slot.owner_id)
    .bind(requester_id)
    .bind(RequestStatus::Pending.as_str())
    .bind(Json(&snapshot))
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        "Created match request {} for slot {} by {}",
        request.id,
        slot_id,
        requester_id
    );
    Ok(RequestCreateOutcome::Applied(request))
}

pub async fn get_match_request_by_id(
    pool: &Pool<Postgres>,
    request_id: Uuid,
) -> Result<Option<DbMatchRequest>> {
    let request = sqlx::query_as::<_, DbMatchRequest>(
        r#"
        SELECT id, slot_id, slot_owner_id, requester_id, status, slot_snapshot,
               created_at, updated_at
        FROM match_requests
        WHERE id = $1
        "#,
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

/// Pending requests against slots owned by `owner_id`, newest first.
pub async fn list_pending_for_owner(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
) -> Result<Vec<DbMatchRequest>> {
    let requests = sqlx::query_as::<_, DbMatchRequest>(
        r#"
        SELECT id, slot_id, slot_owner_id, requester_id, status, slot_snapshot,
               created_at, updated_at
        FROM match_requests
        WHERE slot_owner_id = $1 AND status = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .bind(RequestStatus::Pending.as_str())
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Atomically moves a request from `expected` to `next`. When
/// `slot_transition` is given, the referenced slot must simultaneously move
/// between the two given statuses in the same transaction.
///
/// The request row is locked first, then the slot row, always in that order.
/// Concurrent transitions on the same request serialize on the first lock;
/// the loser re-reads the winner's write and reports `Conflict`.
pub async fn transition_request(
    pool: &Pool<Postgres>,
    request_id: Uuid,
    expected: RequestStatus,
    next: RequestStatus,
    slot_transition: Option<(SlotStatus, SlotStatus)>,
) -> Result<TransitionOutcome> {
    if !expected.can_transition_to(next) {
        return Err(eyre::eyre!("illegal request transition {expected} -> {next}"));
    }

    let mut tx = pool.begin().await?;

    let Some(request) = sqlx::query_as::<_, DbMatchRequest>(
        r#"
        SELECT id, slot_id, slot_owner_id, requester_id, status, slot_snapshot,
               created_at, updated_at
        FROM match_requests
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(request_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(TransitionOutcome::NotFound("Request not found".to_string()));
    };

    if request.status != expected.as_str() {
        return Ok(TransitionOutcome::Conflict(format!(
            "Request is no longer {expected}"
        )));
    }

    if let Some((slot_expected, slot_next)) = slot_transition {
        let Some(slot) = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, owner_id, day, start_time, end_time, duration_minutes,
                   is_recurring, status, created_at, updated_at
            FROM slots
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(request.slot_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(TransitionOutcome::NotFound("Slot not found".to_string()));
        };

        if slot.status != slot_expected.as_str() {
            return Ok(TransitionOutcome::Conflict(format!(
                "Slot is no longer {slot_expected}"
            )));
        }

        sqlx::query("UPDATE slots SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(slot.id)
            .bind(slot_next.as_str())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
    }

    let now = Utc::now();
    let updated = sqlx::query_as::<_, DbMatchRequest>(
        r#"
        UPDATE match_requests
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING id, slot_id, slot_owner_id, requester_id, status, slot_snapshot,
                  created_at, updated_at
        "#,
    )
    .bind(request_id)
    .bind(next.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Match request {} moved to {}", request_id, next);
    Ok(TransitionOutcome::Applied(updated))
}
