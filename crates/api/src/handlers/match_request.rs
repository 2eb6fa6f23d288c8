use axum::extract::{Path, State};
use axum::Json;
use peerslot_core::errors::SlotError;
use peerslot_core::models::match_request::{
    CreateMatchRequest, IncomingMatchRequest, IncomingRequestsResponse, MatchRequestResponse,
    RequestStatus,
};
use peerslot_core::models::slot::SlotStatus;
use peerslot_db::models::DbMatchRequest;
use peerslot_db::repositories::match_request::{RequestCreateOutcome, TransitionOutcome};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::middleware::error_handling::AppError;
use crate::ApiState;

/// Maps a transition outcome onto the API error surface.
pub fn map_transition_outcome(outcome: TransitionOutcome) -> Result<DbMatchRequest, AppError> {
    match outcome {
        TransitionOutcome::Applied(request) => Ok(request),
        TransitionOutcome::Conflict(message) => Err(AppError(SlotError::Conflict(message))),
        TransitionOutcome::NotFound(message) => Err(AppError(SlotError::NotFound(message))),
    }
}

fn response(request: DbMatchRequest) -> Result<MatchRequestResponse, AppError> {
    let request = request.into_core().map_err(SlotError::Database)?;
    Ok(MatchRequestResponse::from(request))
}

#[axum::debug_handler]
pub async fn create_match_request(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Json(payload): Json<CreateMatchRequest>,
) -> Result<Json<MatchRequestResponse>, AppError> {
    let outcome = peerslot_db::repositories::match_request::create_match_request(
        &state.db_pool,
        payload.slot_id,
        user.id,
    )
    .await
    .map_err(SlotError::Database)?;

    let request = match outcome {
        RequestCreateOutcome::Applied(request) => request,
        RequestCreateOutcome::SlotNotFound => {
            return Err(AppError(SlotError::NotFound("Slot not found".to_string())));
        }
        RequestCreateOutcome::SlotNotAvailable(status) => {
            return Err(AppError(SlotError::Conflict(format!(
                "Slot is no longer available (currently {status})"
            ))));
        }
        RequestCreateOutcome::OwnSlot => {
            return Err(AppError(SlotError::Authorization(
                "Cannot request a match with your own slot".to_string(),
            )));
        }
    };

    Ok(Json(response(request)?))
}

/// Pending requests against the caller's slots, with requester names joined
/// in for the dashboard.
#[axum::debug_handler]
pub async fn incoming_requests(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
) -> Result<Json<IncomingRequestsResponse>, AppError> {
    let rows =
        peerslot_db::repositories::match_request::list_pending_for_owner(&state.db_pool, user.id)
            .await
            .map_err(SlotError::Database)?;

    let mut requester_ids: Vec<Uuid> = rows.iter().map(|row| row.requester_id).collect();
    requester_ids.sort_unstable();
    requester_ids.dedup();

    let requesters =
        peerslot_db::repositories::user::get_users_by_ids(&state.db_pool, &requester_ids)
            .await
            .map_err(SlotError::Database)?;
    let names: HashMap<Uuid, String> = requesters
        .iter()
        .map(|requester| (requester.id, requester.name.clone()))
        .collect();

    let mut requests = Vec::with_capacity(rows.len());
    for row in rows {
        let request = row.into_core().map_err(SlotError::Database)?;
        let requester_name = names
            .get(&request.requester_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        requests.push(IncomingMatchRequest {
            id: request.id,
            slot_id: request.slot_id,
            requester_id: request.requester_id,
            requester_name,
            slot_snapshot: request.slot_snapshot,
            created_at: request.created_at,
        });
    }

    Ok(Json(IncomingRequestsResponse { requests }))
}

/// Owner accepts: the request turns `accepted` and the slot turns `matched`,
/// atomically.
#[axum::debug_handler]
pub async fn accept_request(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<MatchRequestResponse>, AppError> {
    let request = require_request(&state, request_id).await?;
    if request.slot_owner_id != user.id {
        return Err(AppError(SlotError::Authorization(
            "Only the slot owner can accept a match request".to_string(),
        )));
    }

    let outcome = peerslot_db::repositories::match_request::transition_request(
        &state.db_pool,
        request_id,
        RequestStatus::Pending,
        RequestStatus::Accepted,
        Some((SlotStatus::Available, SlotStatus::Matched)),
    )
    .await
    .map_err(SlotError::Database)?;

    Ok(Json(response(map_transition_outcome(outcome)?)?))
}

/// Owner rejects: the request turns `rejected`; the slot is untouched and
/// stays open for other requesters.
#[axum::debug_handler]
pub async fn reject_request(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<MatchRequestResponse>, AppError> {
    let request = require_request(&state, request_id).await?;
    if request.slot_owner_id != user.id {
        return Err(AppError(SlotError::Authorization(
            "Only the slot owner can reject a match request".to_string(),
        )));
    }

    let outcome = peerslot_db::repositories::match_request::transition_request(
        &state.db_pool,
        request_id,
        RequestStatus::Pending,
        RequestStatus::Rejected,
        None,
    )
    .await
    .map_err(SlotError::Database)?;

    Ok(Json(response(map_transition_outcome(outcome)?)?))
}

/// Requester withdraws a pending request.
#[axum::debug_handler]
pub async fn cancel_request(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<MatchRequestResponse>, AppError> {
    let request = require_request(&state, request_id).await?;
    if request.requester_id != user.id {
        return Err(AppError(SlotError::Authorization(
            "Only the requester can cancel a match request".to_string(),
        )));
    }

    let outcome = peerslot_db::repositories::match_request::transition_request(
        &state.db_pool,
        request_id,
        RequestStatus::Pending,
        RequestStatus::Cancelled,
        None,
    )
    .await
    .map_err(SlotError::Database)?;

    Ok(Json(response(map_transition_outcome(outcome)?)?))
}

async fn require_request(
    state: &Arc<ApiState>,
    request_id: Uuid,
) -> Result<DbMatchRequest, AppError> {
    let request = peerslot_db::repositories::match_request::get_match_request_by_id(
        &state.db_pool,
        request_id,
    )
    .await
    .map_err(SlotError::Database)?
    .ok_or_else(|| SlotError::NotFound("Request not found".to_string()))?;

    Ok(request)
}
