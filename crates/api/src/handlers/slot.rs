use axum::extract::{Path, State};
use axum::Json;
use peerslot_core::errors::SlotError;
use peerslot_core::models::slot::{
    CreateSlotRequest, DaySlotCount, DeleteSlotResponse, Slot, SlotListResponse, SlotPatch,
    SlotResponse, SlotRulesResponse, SlotStatsResponse, SlotStatus, Weekday,
};
use peerslot_core::rules;
use peerslot_db::models::DbSlot;
use peerslot_db::repositories::slot::SlotWriteOutcome;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::middleware::error_handling::AppError;
use crate::ApiState;

/// Maps a guarded-write outcome onto the API error surface. `action` names
/// the attempted operation ("create", "edit", "delete") for the messages.
pub fn map_write_outcome(outcome: SlotWriteOutcome, action: &str) -> Result<Slot, AppError> {
    match outcome {
        SlotWriteOutcome::Applied(slot) => slot.into_core().map_err(|e| AppError(SlotError::Database(e))),
        SlotWriteOutcome::Invalid(message) => Err(AppError(SlotError::Validation(message))),
        SlotWriteOutcome::NotFound => {
            Err(AppError(SlotError::NotFound("Slot not found".to_string())))
        }
        SlotWriteOutcome::NotOwner => Err(AppError(SlotError::Authorization(format!(
            "You can only {action} your own slots"
        )))),
        SlotWriteOutcome::NotAvailable(status) => Err(AppError(SlotError::Conflict(format!(
            "Cannot {action} a slot that is {status}"
        )))),
    }
}

fn sorted_responses(rows: Vec<DbSlot>) -> Result<Vec<SlotResponse>, AppError> {
    let mut slots = rows
        .into_iter()
        .map(DbSlot::into_core)
        .collect::<eyre::Result<Vec<Slot>>>()
        .map_err(SlotError::Database)?;

    rules::sort_slots(&mut slots);
    Ok(slots.into_iter().map(SlotResponse::from).collect())
}

#[axum::debug_handler]
pub async fn list_own_slots(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
) -> Result<Json<SlotListResponse>, AppError> {
    let rows = peerslot_db::repositories::slot::list_slots_by_owner(&state.db_pool, user.id)
        .await
        .map_err(SlotError::Database)?;

    Ok(Json(SlotListResponse {
        slots: sorted_responses(rows)?,
    }))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    let outcome = peerslot_db::repositories::slot::create_slot(
        &state.db_pool,
        user.id,
        &payload.draft(),
        payload.is_recurring.unwrap_or(true),
    )
    .await
    .map_err(SlotError::Database)?;

    let slot = map_write_outcome(outcome, "create")?;
    Ok(Json(SlotResponse::from(slot)))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(slot_id): Path<Uuid>,
    Json(payload): Json<SlotPatch>,
) -> Result<Json<SlotResponse>, AppError> {
    let outcome =
        peerslot_db::repositories::slot::update_slot(&state.db_pool, slot_id, user.id, &payload)
            .await
            .map_err(SlotError::Database)?;

    let slot = map_write_outcome(outcome, "edit")?;
    Ok(Json(SlotResponse::from(slot)))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<DeleteSlotResponse>, AppError> {
    let outcome =
        peerslot_db::repositories::slot::delete_slot(&state.db_pool, slot_id, user.id)
            .await
            .map_err(SlotError::Database)?;

    let slot = map_write_outcome(outcome, "delete")?;
    Ok(Json(DeleteSlotResponse { deleted_id: slot.id }))
}

#[axum::debug_handler]
pub async fn slot_stats(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
) -> Result<Json<SlotStatsResponse>, AppError> {
    let rows = peerslot_db::repositories::slot::list_slots_by_owner(&state.db_pool, user.id)
        .await
        .map_err(SlotError::Database)?;

    let slots = rows
        .into_iter()
        .map(DbSlot::into_core)
        .collect::<eyre::Result<Vec<Slot>>>()
        .map_err(SlotError::Database)?;

    let by_day = Weekday::ALL
        .iter()
        .map(|&day| DaySlotCount {
            day,
            count: slots.iter().filter(|slot| slot.day == day).count(),
        })
        .collect();

    let count_status = |status: SlotStatus| slots.iter().filter(|slot| slot.status == status).count();

    Ok(Json(SlotStatsResponse {
        total: slots.len(),
        available: count_status(SlotStatus::Available),
        booked: count_status(SlotStatus::Booked),
        matched: count_status(SlotStatus::Matched),
        by_day,
    }))
}

#[axum::debug_handler]
pub async fn slot_rules() -> Json<SlotRulesResponse> {
    Json(SlotRulesResponse {
        min_duration_minutes: rules::MIN_DURATION_MINUTES,
        max_duration_minutes: rules::MAX_DURATION_MINUTES,
        max_slots_per_day: rules::MAX_SLOTS_PER_DAY,
        max_total_slots: rules::MAX_TOTAL_SLOTS,
        earliest_time: rules::EARLIEST_TIME.to_string(),
        latest_time: rules::LATEST_TIME.to_string(),
        time_grid: rules::time_slot_grid(),
    })
}
