use chrono::{DateTime, Utc};
use eyre::Result;
use peerslot_core::models::match_request::{MatchRequest, SlotSnapshot};
use peerslot_core::models::slot::Slot;
use peerslot_core::models::user::{PeerProfile, UserProfile};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of `slots`. Day and status are stored as their canonical text forms;
/// [`DbSlot::into_core`] re-types them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i32,
    pub is_recurring: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbSlot {
    pub fn into_core(self) -> Result<Slot> {
        Ok(Slot {
            id: self.id,
            owner_id: self.owner_id,
            day: self.day.parse()?,
            start_time: self.start_time,
            end_time: self.end_time,
            duration: self.duration_minutes,
            is_recurring: self.is_recurring,
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row of `match_requests`. The snapshot column is JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMatchRequest {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub slot_owner_id: Uuid,
    pub requester_id: Uuid,
    pub status: String,
    pub slot_snapshot: Json<SlotSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbMatchRequest {
    pub fn into_core(self) -> Result<MatchRequest> {
        Ok(MatchRequest {
            id: self.id,
            slot_id: self.slot_id,
            slot_owner_id: self.slot_owner_id,
            requester_id: self.requester_id,
            status: self.status.parse()?,
            slot_snapshot: self.slot_snapshot.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub subjects: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DbUser {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            subjects: self.subjects.clone(),
            created_at: self.created_at,
        }
    }

    pub fn peer_profile(&self) -> PeerProfile {
        PeerProfile {
            id: self.id,
            name: self.name.clone(),
            subjects: self.subjects.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
