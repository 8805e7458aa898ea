//! Guard duty model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use guardies_core::schedule::TimeRange;
use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A guard duty row from the `guards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Guard {
    pub id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub guard_type: String,
    pub status_id: StatusId,
    pub location: Option<String>,
    pub notes: Option<String>,
    /// Set for class covers generated from an outing.
    pub outing_id: Option<DbId>,
    /// Professor whose class this guard covers, if any.
    pub absent_professor_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Guard {
    /// `ck_guards_times` guarantees start < end.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// DTO for creating a guard. New guards always start as pending.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGuard {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub guard_type: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub outing_id: Option<DbId>,
    pub absent_professor_id: Option<DbId>,
}

/// DTO for updating a guard. Status changes go through
/// `GuardRepo::complete` and the assignment endpoints instead.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGuard {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub guard_type: Option<String>,
    pub status_id: Option<StatusId>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub absent_professor_id: Option<DbId>,
}
