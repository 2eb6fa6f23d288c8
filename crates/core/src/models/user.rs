use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::slot::SlotResponse;

/// The caller's own account as returned by `/api/me` and the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub subjects: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// What one user may see of another: no email, no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerProfile {
    pub id: Uuid,
    pub name: String,
    pub subjects: Vec<String>,
}

// Request/Response DTOs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful register or login: a bearer token plus the account it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

/// One card in the peer browser: an open slot and whose it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSlot {
    pub slot: SlotResponse,
    pub owner: PeerProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSlotsResponse {
    pub slots: Vec<OpenSlot>,
}

/// Body of `GET /api/peers/:id/slots`: the peer plus their open slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerSlotsResponse {
    pub peer: PeerProfile,
    pub slots: Vec<SlotResponse>,
}
