//! Business rules for availability slots.
//!
//! The validator is pure: the caller supplies the owner's current slots and
//! gets back either the typed, derived values or the first violated rule.
//! Making the snapshot an argument leaves atomicity to the storage layer,
//! which re-runs these checks inside the transaction that performs the write.

use uuid::Uuid;

use crate::errors::SlotError;
use crate::models::slot::{Slot, SlotDraft, Weekday};
use crate::time::{
    calculate_duration, format_time_display, is_valid_time, minutes_to_time, time_to_minutes,
    times_overlap,
};

pub const MIN_DURATION_MINUTES: i32 = 30;
pub const MAX_DURATION_MINUTES: i32 = 180;
pub const MAX_SLOTS_PER_DAY: usize = 5;
pub const MAX_TOTAL_SLOTS: usize = 20;
pub const EARLIEST_TIME: &str = "06:00";
pub const LATEST_TIME: &str = "23:00";

/// Half-hour boundaries from [`EARLIEST_TIME`] through [`LATEST_TIME`],
/// inclusive on both ends. Clients feed these to their time pickers.
pub fn time_slot_grid() -> Vec<String> {
    let first = time_to_minutes(EARLIEST_TIME);
    let last = time_to_minutes(LATEST_TIME);

    (first..=last).step_by(30).map(minutes_to_time).collect()
}

/// A draft that passed every rule, with the derived values the caller needs
/// to persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSlot {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub duration: i32,
}

/// Checks a proposed slot against the business rules, in a fixed order so the
/// caller always sees the single most relevant message. `existing` is the
/// owner's current slots; pass every one of them, overlap and count rules
/// only consider the relevant day.
///
/// For edits use [`validate_slot_update`], which drops the slot under edit
/// from the snapshot first.
pub fn validate_slot(draft: &SlotDraft, existing: &[Slot]) -> Result<ValidatedSlot, SlotError> {
    let day_raw = draft.day.trim();
    let start_time = draft.start_time.trim();
    let end_time = draft.end_time.trim();

    if day_raw.is_empty() || start_time.is_empty() || end_time.is_empty() {
        return Err(SlotError::Validation("Please fill all fields".to_string()));
    }

    let Ok(day) = day_raw.parse::<Weekday>() else {
        return Err(SlotError::Validation("Invalid day selected".to_string()));
    };

    if !is_valid_time(start_time) || !is_valid_time(end_time) {
        return Err(SlotError::Validation("Invalid time format".to_string()));
    }

    // Zero-padded fixed-width times compare correctly as strings.
    if start_time < EARLIEST_TIME {
        return Err(SlotError::Validation(format!(
            "Slots cannot start before {}",
            format_time_display(EARLIEST_TIME)
        )));
    }

    if end_time > LATEST_TIME {
        return Err(SlotError::Validation(format!(
            "Slots cannot end after {}",
            format_time_display(LATEST_TIME)
        )));
    }

    let duration = calculate_duration(start_time, end_time);
    if duration <= 0 {
        return Err(SlotError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    if duration < MIN_DURATION_MINUTES {
        return Err(SlotError::Validation(format!(
            "Minimum slot duration is {MIN_DURATION_MINUTES} minutes"
        )));
    }

    if duration > MAX_DURATION_MINUTES {
        return Err(SlotError::Validation(format!(
            "Maximum slot duration is {} hours",
            MAX_DURATION_MINUTES / 60
        )));
    }

    if existing.len() >= MAX_TOTAL_SLOTS {
        return Err(SlotError::Validation(format!(
            "Maximum {MAX_TOTAL_SLOTS} slots allowed"
        )));
    }

    let same_day: Vec<&Slot> = existing.iter().filter(|slot| slot.day == day).collect();

    if same_day.len() >= MAX_SLOTS_PER_DAY {
        return Err(SlotError::Validation(format!(
            "Maximum {MAX_SLOTS_PER_DAY} slots per day"
        )));
    }

    for slot in same_day {
        if times_overlap(start_time, end_time, &slot.start_time, &slot.end_time) {
            return Err(SlotError::Validation(format!(
                "Overlaps with existing slot: {} {} - {}",
                slot.day.short(),
                format_time_display(&slot.start_time),
                format_time_display(&slot.end_time)
            )));
        }
    }

    Ok(ValidatedSlot {
        day,
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        duration,
    })
}

/// Edit variant of [`validate_slot`]: excludes the slot being edited from the
/// snapshot, so an edit never overlaps or counts against itself.
pub fn validate_slot_update(
    draft: &SlotDraft,
    existing: &[Slot],
    current_id: Uuid,
) -> Result<ValidatedSlot, SlotError> {
    let others: Vec<Slot> = existing
        .iter()
        .filter(|slot| slot.id != current_id)
        .cloned()
        .collect();

    validate_slot(draft, &others)
}

/// Canonical listing order: weekday first (Monday through Sunday), then
/// start time within the day.
pub fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by_key(|slot| (slot.day.index(), time_to_minutes(&slot.start_time)));
}
