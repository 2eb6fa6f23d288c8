use axum::extract::{Path, Query, State};
use axum::Json;
use peerslot_core::errors::SlotError;
use peerslot_core::models::slot::{Slot, SlotResponse, SlotStatus};
use peerslot_core::models::user::{OpenSlot, OpenSlotsResponse, PeerProfile, PeerSlotsResponse};
use peerslot_core::rules;
use peerslot_db::models::DbSlot;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::middleware::error_handling::AppError;
use crate::ApiState;

/// Optional filters for the peer browser.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Keep only owners who list this subject.
    pub subject: Option<String>,
    /// Keep only slots on this day; full ("Monday") or short ("Mon") name.
    pub day: Option<String>,
}

fn placeholder_profile(owner_id: Uuid) -> PeerProfile {
    PeerProfile {
        id: owner_id,
        name: "Unknown".to_string(),
        subjects: Vec::new(),
    }
}

#[axum::debug_handler]
pub async fn browse_open_slots(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<OpenSlotsResponse>, AppError> {
    let rows = peerslot_db::repositories::slot::list_open_slots(&state.db_pool, user.id)
        .await
        .map_err(SlotError::Database)?;

    let mut slots = rows
        .into_iter()
        .map(DbSlot::into_core)
        .collect::<eyre::Result<Vec<Slot>>>()
        .map_err(SlotError::Database)?;
    rules::sort_slots(&mut slots);

    // One batched profile lookup for all owners in the listing.
    let mut owner_ids: Vec<Uuid> = slots.iter().map(|slot| slot.owner_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners = peerslot_db::repositories::user::get_users_by_ids(&state.db_pool, &owner_ids)
        .await
        .map_err(SlotError::Database)?;
    let profiles: HashMap<Uuid, PeerProfile> = owners
        .iter()
        .map(|owner| (owner.id, owner.peer_profile()))
        .collect();

    let mut open_slots = Vec::with_capacity(slots.len());
    for slot in slots {
        let owner = profiles
            .get(&slot.owner_id)
            .cloned()
            .unwrap_or_else(|| placeholder_profile(slot.owner_id));

        if let Some(subject) = &query.subject {
            if !owner.subjects.iter().any(|s| s == subject) {
                continue;
            }
        }

        if let Some(day) = &query.day {
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

#[axum::debug_handler]
pub async fn peer_slots(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<PeerSlotsResponse>, AppError> {
    if peer_id == user.id {
        return Err(AppError(SlotError::Authorization(
            "Cannot view your own availability as a peer".to_string(),
        )));
    }

    let peer = peerslot_db::repositories::user::get_user_by_id(&state.db_pool, peer_id)
        .await
        .map_err(SlotError::Database)?
        .ok_or_else(|| SlotError::NotFound(format!("User {} not found", peer_id)))?;

    let rows = peerslot_db::repositories::slot::list_slots_by_owner_and_status(
        &state.db_pool,
        peer_id,
        SlotStatus::Available,
    )
    .await
    .map_err(SlotError::Database)?;

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
