use chrono::{DateTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::slot::{Slot, Weekday};

/// Lifecycle of a match request. `Pending` is the only live state; the three
/// terminal states record who ended the request and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// The full transition table. Pending may move to any terminal state;
    /// terminal states never move again.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (*self, next),
            (
                RequestStatus::Pending,
                RequestStatus::Accepted | RequestStatus::Rejected | RequestStatus::Cancelled
            )
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(eyre!("unknown request status: {s}")),
        }
    }
}

/// Copy of the slot's schedule taken when the request is created. Dashboards
/// render from this even if the owner later reshapes the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub duration: i32,
}

impl From<&Slot> for SlotSnapshot {
    fn from(slot: &Slot) -> Self {
        SlotSnapshot {
            day: slot.day,
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            duration: slot.duration,
        }
    }
}

/// A peer's claim on someone else's slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub slot_owner_id: Uuid,
    pub requester_id: Uuid,
    pub status: RequestStatus,
    pub slot_snapshot: SlotSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Request/Response DTOs

/// Body of `POST /api/match-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub slot_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequestResponse {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub slot_owner_id: Uuid,
    pub requester_id: Uuid,
    pub status: RequestStatus,
    pub slot_snapshot: SlotSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MatchRequest> for MatchRequestResponse {
    fn from(request: MatchRequest) -> Self {
        MatchRequestResponse {
            id: request.id,
            slot_id: request.slot_id,
            slot_owner_id: request.slot_owner_id,
            requester_id: request.requester_id,
            status: request.status,
            slot_snapshot: request.slot_snapshot,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// One row of the owner's incoming dashboard: the pending request plus the
/// requester's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMatchRequest {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub requester_id: Uuid,
    pub requester_name: String,
    pub slot_snapshot: SlotSnapshot,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingRequestsResponse {
    pub requests: Vec<IncomingMatchRequest>,
}
