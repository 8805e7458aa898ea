//! Weekly timetable evaluation.
//!
//! A professor's week is a list of [`ScheduleEntry`] rows. Entries whose
//! subject code is [`GUARD_SUBJECT_CODE`] mark hours reserved for guard duty
//! rather than a taught subject.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::validate_time_range;

/// Subject code marking a guard-duty hour in the timetable.
pub const GUARD_SUBJECT_CODE: &str = "G";

/// First school day (Monday, ISO numbering).
pub const FIRST_SCHOOL_DAY: i16 = 1;
/// Last school day (Friday, ISO numbering).
pub const LAST_SCHOOL_DAY: i16 = 5;

/// Weekdays are stored as ISO numbers, Monday = 1.
pub fn validate_weekday(weekday: i16) -> Result<(), CoreError> {
    if (FIRST_SCHOOL_DAY..=LAST_SCHOOL_DAY).contains(&weekday) {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Weekday must be between {FIRST_SCHOOL_DAY} (Monday) and {LAST_SCHOOL_DAY} (Friday), got {weekday}"
        )))
    }
}

/// ISO weekday number (Monday = 1) of a calendar date.
pub fn weekday_of(date: NaiveDate) -> i16 {
    date.weekday().number_from_monday() as i16
}

/// Returns `true` for Monday..=Friday.
pub fn is_school_day(date: NaiveDate) -> bool {
    weekday_of(date) <= LAST_SCHOOL_DAY
}

/// Returns `true` if `code` is the guard-duty subject code.
pub fn is_guard_code(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(GUARD_SUBJECT_CODE)
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, CoreError> {
        validate_time_range(start, end)?;
        Ok(Self { start, end })
    }

    /// Back-to-back ranges (one ends when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A weekday and time range, e.g. Tuesday 10:00-11:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub weekday: i16,
    pub range: TimeRange,
}

impl Slot {
    pub fn on_date(date: NaiveDate, range: TimeRange) -> Self {
        Self {
            weekday: weekday_of(date),
            range,
        }
    }
}

/// One recurring timetable commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: DbId,
    pub professor_id: DbId,
    pub weekday: i16,
    pub range: TimeRange,
    pub subject_code: String,
}

impl ScheduleEntry {
    pub fn is_guard(&self) -> bool {
        is_guard_code(&self.subject_code)
    }

    pub fn overlaps(&self, slot: &Slot) -> bool {
        self.weekday == slot.weekday && self.range.overlaps(&slot.range)
    }
}

/// What a professor is doing during a slot according to their timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Holds a guard-duty hour (`G`) overlapping the slot.
    OnGuard,
    /// Teaches a class overlapping the slot and can be pulled to substitute.
    Teaching,
    /// Nothing scheduled.
    Free,
}

/// Status of `professor_id` during `slot`. A guard hour wins over a class
/// when both overlap the slot.
pub fn professor_status_at(
    entries: &[ScheduleEntry],
    professor_id: DbId,
    slot: &Slot,
) -> SlotStatus {
    let mut status = SlotStatus::Free;
    for entry in entries
        .iter()
        .filter(|e| e.professor_id == professor_id && e.overlaps(slot))
    {
        if entry.is_guard() {
            return SlotStatus::OnGuard;
        }
        status = SlotStatus::Teaching;
    }
    status
}
