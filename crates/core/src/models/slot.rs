use chrono::{DateTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::time::format_time_display;

/// Days of the week, Monday first. The declaration order is the sort key for
/// every slot listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Position in the week, 0 for Monday through 6 for Sunday.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter label for compact listings, "Mon" through "Sun".
    pub fn short(&self) -> &'static str {
        &self.as_str()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| eyre!("unknown weekday: {s}"))
    }
}

/// Lifecycle of a slot. Only `Available` slots may be edited, deleted, or
/// requested; `Matched` is set when the owner accepts a match request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Matched,
    Blocked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Matched => "matched",
            SlotStatus::Blocked => "blocked",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SlotStatus::Available),
            "booked" => Ok(SlotStatus::Booked),
            "matched" => Ok(SlotStatus::Matched),
            "blocked" => Ok(SlotStatus::Blocked),
            _ => Err(eyre!("unknown slot status: {s}")),
        }
    }
}

/// A recurring weekly availability window owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: Weekday,
    /// "HH:MM", 24-hour, zero-padded.
    pub start_time: String,
    pub end_time: String,
    /// Minutes between start and end, stored so listings never recompute it.
    pub duration: i32,
    pub is_recurring: bool,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A candidate slot exactly as the user typed it. [`crate::rules::validate_slot`]
/// turns a draft into typed values or the first violated rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotDraft {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

/// Partial update for a slot. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotPatch {
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_recurring: Option<bool>,
}

impl SlotPatch {
    /// Merge over the stored slot, producing the draft the validator sees.
    pub fn merged_draft(&self, current: &Slot) -> SlotDraft {
        SlotDraft {
            day: self
                .day
                .clone()
                .unwrap_or_else(|| current.day.as_str().to_string()),
            start_time: self
                .start_time
                .clone()
                .unwrap_or_else(|| current.start_time.clone()),
            end_time: self
                .end_time
                .clone()
                .unwrap_or_else(|| current.end_time.clone()),
        }
    }
}

// Request/Response DTOs

/// Body of `POST /api/slots`. The fields default to empty strings so a
/// missing field reaches the validator instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub is_recurring: Option<bool>,
}

impl CreateSlotRequest {
    pub fn draft(&self) -> SlotDraft {
        SlotDraft {
            day: self.day.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub duration: i32,
    pub is_recurring: bool,
    pub status: SlotStatus,
    /// Preformatted 12-hour label, e.g. "10:00 AM - 11:30 AM".
    pub display_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        let display_time = format!(
            "{} - {}",
            format_time_display(&slot.start_time),
            format_time_display(&slot.end_time)
        );

        SlotResponse {
            id: slot.id,
            owner_id: slot.owner_id,
            day: slot.day,
            start_time: slot.start_time,
            end_time: slot.end_time,
            duration: slot.duration,
            is_recurring: slot.is_recurring,
            status: slot.status,
            display_time,
            created_at: slot.created_at,
            updated_at: slot.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub slots: Vec<SlotResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlotResponse {
    pub deleted_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlotCount {
    pub day: Weekday,
    pub count: usize,
}

/// Body of `GET /api/slots/stats`: totals over the caller's own slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStatsResponse {
    pub total: usize,
    pub available: usize,
    pub booked: usize,
    pub matched: usize,
    /// One entry per weekday, Monday first, zero counts included.
    pub by_day: Vec<DaySlotCount>,
}

/// Body of `GET /api/slots/rules`: the limits clients mirror in their forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRulesResponse {
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub max_slots_per_day: usize,
    pub max_total_slots: usize,
    pub earliest_time: String,
    pub latest_time: String,
    /// Half-hour picker boundaries from earliest to latest, inclusive.
    pub time_grid: Vec<String>,
}
