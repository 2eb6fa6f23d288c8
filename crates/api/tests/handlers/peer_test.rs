use axum::Json;
use mockall::predicate;
use peerslot_core::{
    errors::SlotError,
    models::slot::{Slot, SlotResponse, SlotStatus, Weekday},
    models::user::{OpenSlot, OpenSlotsResponse, PeerProfile, PeerSlotsResponse},
    rules,
};
use peerslot_db::models::DbSlot;
use std::collections::HashMap;
use uuid::Uuid;

use crate::test_utils::{sample_slot, sample_user, TestContext};
use peerslot_api::middleware::error_handling::AppError;

// Wrappers that replay the handler flows against the mock repositories.

async fn test_browse_wrapper(
    ctx: &mut TestContext,
    caller: Uuid,
    subject: Option<&str>,
    day: Option<&str>,
) -> Result<Json<OpenSlotsResponse>, AppError> {
    let rows = ctx.slot_repo.list_open_slots(caller).await?;

    let mut slots = rows
        .into_iter()
        .map(DbSlot::into_core)
        .collect::<eyre::Result<Vec<Slot>>>()
        .map_err(SlotError::Database)?;
    rules::sort_slots(&mut slots);

    let mut owner_ids: Vec<Uuid> = slots.iter().map(|slot| slot.owner_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners = ctx.user_repo.get_users_by_ids(owner_ids).await?;
    let profiles: HashMap<Uuid, PeerProfile> = owners
        .iter()
        .map(|owner| (owner.id, owner.peer_profile()))
        .collect();

    let mut open_slots = Vec::with_capacity(slots.len());
    for slot in slots {
        let owner = profiles.get(&slot.owner_id).cloned().unwrap_or(PeerProfile {
            id: slot.owner_id,
            name: "Unknown".to_string(),
            subjects: Vec::new(),
        });

        if let Some(subject) = subject {
            if !owner.subjects.iter().any(|s| s == subject) {
                continue;
            }
        }

        if let Some(day) = day {
            if slot.day.as_str() != day && slot.day.short() != day {
                continue;
            }
        }

        open_slots.push(OpenSlot {
            slot: SlotResponse::from(slot),
            owner,
        });
    }

    Ok(Json(OpenSlotsResponse { slots: open_slots }))
}

async fn test_peer_slots_wrapper(
    ctx: &mut TestContext,
    caller: Uuid,
    peer_id: Uuid,
) -> Result<Json<PeerSlotsResponse>, AppError> {
    if peer_id == caller {
        return Err(AppError(SlotError::Authorization(
            "Cannot view your own availability as a peer".to_string(),
        )));
    }

    let peer = ctx
        .user_repo
        .get_user_by_id(peer_id)
        .await?
        .ok_or_else(|| SlotError::NotFound(format!("User {} not found", peer_id)))?;

    let rows = ctx
        .slot_repo
        .list_slots_by_owner_and_status(peer_id, SlotStatus::Available)
        .await?;

    let mut slots = rows
        .into_iter()
        .map(DbSlot::into_core)
        .collect::<eyre::Result<Vec<Slot>>>()
        .map_err(SlotError::Database)?;
    rules::sort_slots(&mut slots);

    Ok(Json(PeerSlotsResponse {
        peer: peer.peer_profile(),
        slots: slots.into_iter().map(SlotResponse::from).collect(),
    }))
}

#[tokio::test]
async fn test_browse_joins_owner_profiles() {
    let mut ctx = TestContext::new();
    let caller = Uuid::new_v4();
    let owner = sample_user("Noor");
    let owner_id = owner.id;

    let rows = vec![
        sample_slot(owner_id, "Tuesday", "10:00", "11:00"),
        sample_slot(owner_id, "Monday", "09:00", "10:00"),
    ];

    ctx.slot_repo
        .expect_list_open_slots()
        .with(predicate::eq(caller))
        .returning(move |_| Ok(rows.clone()));

    ctx.user_repo
        .expect_get_users_by_ids()
        .withf(move |ids| ids == &[owner_id])
        .returning(move |_| Ok(vec![owner.clone()]));

    let result = test_browse_wrapper(&mut ctx, caller, None, None).await;

    let response = result.unwrap().0;
    assert_eq!(response.slots.len(), 2);
    // Sorted by day, so Monday leads even though Tuesday was listed first.
    assert_eq!(response.slots[0].slot.day, Weekday::Monday);
    assert_eq!(response.slots[0].owner.name, "Noor");
    assert_eq!(response.slots[1].owner.subjects, vec!["Math".to_string()]);
}

#[tokio::test]
async fn test_browse_filters_by_subject() {
    let mut ctx = TestContext::new();
    let caller = Uuid::new_v4();
    let math_tutor = sample_user("Noor");
    let mut history_tutor = sample_user("Omar");
    history_tutor.subjects = vec!["History".to_string()];

    let rows = vec![
        sample_slot(math_tutor.id, "Monday", "09:00", "10:00"),
        sample_slot(history_tutor.id, "Monday", "10:00", "11:00"),
    ];

    ctx.slot_repo
        .expect_list_open_slots()
        .returning(move |_| Ok(rows.clone()));

    let owners = vec![math_tutor.clone(), history_tutor.clone()];
    ctx.user_repo
        .expect_get_users_by_ids()
        .returning(move |_| Ok(owners.clone()));

    let result = test_browse_wrapper(&mut ctx, caller, Some("History"), None).await;

    let response = result.unwrap().0;
    assert_eq!(response.slots.len(), 1);
    assert_eq!(response.slots[0].owner.name, "Omar");
}

#[tokio::test]
async fn test_browse_filters_by_day_short_name() {
    let mut ctx = TestContext::new();
    let caller = Uuid::new_v4();
    let owner = sample_user("Noor");
    let owner_id = owner.id;

    let rows = vec![
        sample_slot(owner_id, "Monday", "09:00", "10:00"),
        sample_slot(owner_id, "Friday", "10:00", "11:00"),
    ];

    ctx.slot_repo
        .expect_list_open_slots()
        .returning(move |_| Ok(rows.clone()));

    ctx.user_repo
        .expect_get_users_by_ids()
        .returning(move |_| Ok(vec![owner.clone()]));

    let result = test_browse_wrapper(&mut ctx, caller, None, Some("Fri")).await;

    let response = result.unwrap().0;
    assert_eq!(response.slots.len(), 1);
    assert_eq!(response.slots[0].slot.day, Weekday::Friday);
}

#[tokio::test]
async fn test_browse_unknown_owner_placeholder() {
    let mut ctx = TestContext::new();
    let caller = Uuid::new_v4();
    let orphan_owner = Uuid::new_v4();

    let rows = vec![sample_slot(orphan_owner, "Monday", "09:00", "10:00")];

    ctx.slot_repo
        .expect_list_open_slots()
        .returning(move |_| Ok(rows.clone()));

    // The owner's account row is gone; the listing still renders.
    ctx.user_repo
        .expect_get_users_by_ids()
        .returning(|_| Ok(vec![]));

    let result = test_browse_wrapper(&mut ctx, caller, None, None).await;

    let response = result.unwrap().0;
    assert_eq!(response.slots.len(), 1);
    assert_eq!(response.slots[0].owner.name, "Unknown");
    assert!(response.slots[0].owner.subjects.is_empty());
}

#[tokio::test]
async fn test_peer_slots_rejects_self_view() {
    let mut ctx = TestContext::new();
    let caller = Uuid::new_v4();

    let result = test_peer_slots_wrapper(&mut ctx, caller, caller).await;

    match result.unwrap_err().0 {
        SlotError::Authorization(message) => {
            assert_eq!(message, "Cannot view your own availability as a peer")
        }
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_peer_slots_unknown_peer() {
    let mut ctx = TestContext::new();
    let caller = Uuid::new_v4();
    let peer_id = Uuid::new_v4();

    ctx.user_repo
        .expect_get_user_by_id()
        .with(predicate::eq(peer_id))
        .returning(|_| Ok(None));

    let result = test_peer_slots_wrapper(&mut ctx, caller, peer_id).await;

    match result.unwrap_err().0 {
        SlotError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_peer_slots_sorted_available_only() {
    let mut ctx = TestContext::new();
    let caller = Uuid::new_v4();
    let peer = sample_user("Noor");
    let peer_id = peer.id;

    ctx.user_repo
        .expect_get_user_by_id()
        .returning(move |_| Ok(Some(peer.clone())));

    let rows = vec![
        sample_slot(peer_id, "Sunday", "18:00", "19:00"),
        sample_slot(peer_id, "Monday", "09:00", "10:00"),
    ];

    ctx.slot_repo
        .expect_list_slots_by_owner_and_status()
        .with(predicate::eq(peer_id), predicate::eq(SlotStatus::Available))
        .returning(move |_, _| Ok(rows.clone()));

    let result = test_peer_slots_wrapper(&mut ctx, caller, peer_id).await;

    let response = result.unwrap().0;
    assert_eq!(response.peer.name, "Noor");
    assert_eq!(response.slots.len(), 2);
    assert_eq!(response.slots[0].day, Weekday::Monday);
    assert_eq!(response.slots[1].day, Weekday::Sunday);
}
