//! Weekly schedule model and DTOs.

use chrono::NaiveTime;
use guardies_core::schedule::{ScheduleEntry, TimeRange};
use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recurring timetable slot from the `schedules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Schedule {
    pub id: DbId,
    pub professor_id: DbId,
    /// ISO weekday, Monday = 1.
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Subject code, or `G` for a guard-duty hour.
    pub subject_code: String,
    pub group_name: Option<String>,
    pub room: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Schedule {
    /// Domain view of this row. `ck_schedules_times` guarantees start < end.
    pub fn entry(&self) -> ScheduleEntry {
        ScheduleEntry {
            id: self.id,
            professor_id: self.professor_id,
            weekday: self.weekday,
            range: TimeRange {
                start: self.start_time,
                end: self.end_time,
            },
            subject_code: self.subject_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSchedule {
    pub professor_id: DbId,
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject_code: String,
    pub group_name: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSchedule {
    pub professor_id: Option<DbId>,
    pub weekday: Option<i16>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub subject_code: Option<String>,
    pub group_name: Option<String>,
    pub room: Option<String>,
}
