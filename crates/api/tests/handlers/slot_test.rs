use axum::Json;
use mockall::predicate;
use peerslot_core::{
    errors::SlotError,
    models::slot::{
        CreateSlotRequest, SlotListResponse, SlotPatch, SlotResponse, SlotStatus, Weekday,
    },
    rules,
};
use peerslot_db::models::DbSlot;
use peerslot_db::repositories::slot::SlotWriteOutcome;
use uuid::Uuid;

use crate::test_utils::{sample_slot, TestContext};
use peerslot_api::handlers::slot::map_write_outcome;
use peerslot_api::middleware::error_handling::AppError;

// Wrappers that replay the handler flows against the mock repositories.

async fn test_create_slot_wrapper(
    ctx: &mut TestContext,
    owner_id: Uuid,
    request: CreateSlotRequest,
) -> Result<Json<SlotResponse>, AppError> {
    let outcome = ctx
        .slot_repo
        .create_slot(owner_id, request.draft(), request.is_recurring.unwrap_or(true))
        .await?;

    let slot = map_write_outcome(outcome, "create")?;
    Ok(Json(SlotResponse::from(slot)))
}

async fn test_update_slot_wrapper(
    ctx: &mut TestContext,
    slot_id: Uuid,
    owner_id: Uuid,
    patch: SlotPatch,
) -> Result<Json<SlotResponse>, AppError> {
    let outcome = ctx.slot_repo.update_slot(slot_id, owner_id, patch).await?;

    let slot = map_write_outcome(outcome, "edit")?;
    Ok(Json(SlotResponse::from(slot)))
}

async fn test_delete_slot_wrapper(
    ctx: &mut TestContext,
    slot_id: Uuid,
    owner_id: Uuid,
) -> Result<Uuid, AppError> {
    let outcome = ctx.slot_repo.delete_slot(slot_id, owner_id).await?;

    let slot = map_write_outcome(outcome, "delete")?;
    Ok(slot.id)
}

async fn test_list_own_slots_wrapper(
    ctx: &mut TestContext,
    owner_id: Uuid,
) -> Result<Json<SlotListResponse>, AppError> {
    let rows = ctx.slot_repo.list_slots_by_owner(owner_id).await?;

    let mut slots = rows
        .into_iter()
        .map(DbSlot::into_core)
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(SlotError::Database)?;
    rules::sort_slots(&mut slots);

    Ok(Json(SlotListResponse {
        slots: slots.into_iter().map(SlotResponse::from).collect(),
    }))
}

// map_write_outcome is the real mapping the handlers use; exercise it directly.

#[tokio::test]
async fn test_map_write_outcome_applied() {
    let owner_id = Uuid::new_v4();
    let row = sample_slot(owner_id, "Monday", "10:00", "11:30");
    let row_id = row.id;

    let slot = map_write_outcome(SlotWriteOutcome::Applied(row), "create").unwrap();

    assert_eq!(slot.id, row_id);
    assert_eq!(slot.day, Weekday::Monday);
    assert_eq!(slot.duration, 90);
    assert_eq!(slot.status, SlotStatus::Available);
}

#[tokio::test]
async fn test_map_write_outcome_invalid() {
    let outcome = SlotWriteOutcome::Invalid("Maximum 5 slots per day".to_string());

    let result = map_write_outcome(outcome, "create");

    match result.unwrap_err().0 {
        SlotError::Validation(message) => assert_eq!(message, "Maximum 5 slots per day"),
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_map_write_outcome_not_found() {
    let result = map_write_outcome(SlotWriteOutcome::NotFound, "edit");

    match result.unwrap_err().0 {
        SlotError::NotFound(message) => assert_eq!(message, "Slot not found"),
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_map_write_outcome_not_owner() {
    let result = map_write_outcome(SlotWriteOutcome::NotOwner, "edit");

    match result.unwrap_err().0 {
        SlotError::Authorization(message) => {
            assert_eq!(message, "You can only edit your own slots")
        }
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_map_write_outcome_not_available() {
    let outcome = SlotWriteOutcome::NotAvailable("matched".to_string());

    let result = map_write_outcome(outcome, "delete");

    match result.unwrap_err().0 {
        SlotError::Conflict(message) => {
            assert_eq!(message, "Cannot delete a slot that is matched")
        }
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_slot_success() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let created = sample_slot(owner_id, "Tuesday", "09:00", "10:00");
    let created_id = created.id;

    ctx.slot_repo
        .expect_create_slot()
        .withf(move |oid, draft, is_recurring| {
            *oid == owner_id && draft.day == "Tuesday" && draft.start_time == "09:00" && *is_recurring
        })
        .returning(move |_, _, _| Ok(SlotWriteOutcome::Applied(created.clone())));

    let request = CreateSlotRequest {
        day: "Tuesday".to_string(),
        start_time: "09:00".to_string(),
        end_time: "10:00".to_string(),
        is_recurring: None,
    };

    let result = test_create_slot_wrapper(&mut ctx, owner_id, request).await;

    let response = result.unwrap().0;
    assert_eq!(response.id, created_id);
    assert_eq!(response.day, Weekday::Tuesday);
    assert_eq!(response.display_time, "9:00 AM - 10:00 AM");
}

#[tokio::test]
async fn test_create_slot_validation_rejected() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();

    // The guarded write re-runs the validator and reports the rule it hit.
    ctx.slot_repo
        .expect_create_slot()
        .returning(|_, _, _| Ok(SlotWriteOutcome::Invalid("Please fill all fields".to_string())));

    let request = CreateSlotRequest {
        day: String::new(),
        start_time: String::new(),
        end_time: String::new(),
        is_recurring: None,
    };

    let result = test_create_slot_wrapper(&mut ctx, owner_id, request).await;

    match result.unwrap_err().0 {
        SlotError::Validation(message) => assert_eq!(message, "Please fill all fields"),
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_update_slot_not_owner() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    let caller = Uuid::new_v4();

    ctx.slot_repo
        .expect_update_slot()
        .with(predicate::eq(slot_id), predicate::eq(caller), predicate::always())
        .returning(|_, _, _| Ok(SlotWriteOutcome::NotOwner));

    let patch = SlotPatch {
        start_time: Some("12:00".to_string()),
        ..Default::default()
    };

    let result = test_update_slot_wrapper(&mut ctx, slot_id, caller, patch).await;

    match result.unwrap_err().0 {
        SlotError::Authorization(_) => {}
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_delete_slot_not_available() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    ctx.slot_repo
        .expect_delete_slot()
        .with(predicate::eq(slot_id), predicate::eq(owner_id))
        .returning(|_, _| Ok(SlotWriteOutcome::NotAvailable("booked".to_string())));

    let result = test_delete_slot_wrapper(&mut ctx, slot_id, owner_id).await;

    match result.unwrap_err().0 {
        SlotError::Conflict(message) => {
            assert_eq!(message, "Cannot delete a slot that is booked")
        }
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_delete_slot_success() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let deleted = sample_slot(owner_id, "Friday", "16:00", "17:00");
    let deleted_id = deleted.id;

    ctx.slot_repo
        .expect_delete_slot()
        .returning(move |_, _| Ok(SlotWriteOutcome::Applied(deleted.clone())));

    let result = test_delete_slot_wrapper(&mut ctx, deleted_id, owner_id).await;

    assert_eq!(result.unwrap(), deleted_id);
}

#[tokio::test]
async fn test_list_own_slots_sorted() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();

    // Rows arrive in insertion order; the handler re-sorts by day then start.
    let rows = vec![
        sample_slot(owner_id, "Wednesday", "09:00", "10:00"),
        sample_slot(owner_id, "Monday", "10:00", "11:00"),
        sample_slot(owner_id, "Monday", "08:00", "09:00"),
    ];

    ctx.slot_repo
        .expect_list_slots_by_owner()
        .with(predicate::eq(owner_id))
        .returning(move |_| Ok(rows.clone()));

    let result = test_list_own_slots_wrapper(&mut ctx, owner_id).await;

    let response = result.unwrap().0;
    assert_eq!(response.slots.len(), 3);
    assert_eq!(response.slots[0].day, Weekday::Monday);
    assert_eq!(response.slots[0].start_time, "08:00");
    assert_eq!(response.slots[1].day, Weekday::Monday);
    assert_eq!(response.slots[1].start_time, "10:00");
    assert_eq!(response.slots[2].day, Weekday::Wednesday);
}

#[tokio::test]
async fn test_slot_rules_payload() {
    // No state or auth involved; call the real handler.
    let Json(rules) = peerslot_api::handlers::slot::slot_rules().await;

    assert_eq!(rules.min_duration_minutes, 30);
    assert_eq!(rules.max_duration_minutes, 180);
    assert_eq!(rules.max_slots_per_day, 5);
    assert_eq!(rules.max_total_slots, 20);
    assert_eq!(rules.time_grid.len(), 35);
    assert_eq!(rules.time_grid.first().map(String::as_str), Some("06:00"));
    assert_eq!(rules.time_grid.last().map(String::as_str), Some("23:00"));
}
