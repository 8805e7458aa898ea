//! Outing ("sortida") model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use guardies_core::error::CoreError;
use guardies_core::outing::OutingWindow;
use guardies_core::schedule::TimeRange;
use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An outing row from the `outings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Outing {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Both `None` for a whole-day outing.
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub group_id: Option<DbId>,
    pub location: Option<String>,
    pub responsible_professor_id: DbId,
    pub substitutions_confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Outing {
    pub fn window(&self) -> Result<OutingWindow, CoreError> {
        build_window(self.start_date, self.end_date, self.start_time, self.end_time)
    }
}

/// Validate dates and optional hours into an [`OutingWindow`].
///
/// Hours must be given together or not at all.
pub fn build_window(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Result<OutingWindow, CoreError> {
    let range = match (start_time, end_time) {
        (Some(start), Some(end)) => Some(TimeRange::new(start, end)?),
        (None, None) => None,
        _ => {
            return Err(CoreError::validation(
                "start_time and end_time must be given together",
            ))
        }
    };
    OutingWindow::new(start_date, end_date, range)
}

/// An outing together with every professor away on it.
#[derive(Debug, Clone, Serialize)]
pub struct OutingWithProfessors {
    #[serde(flatten)]
    pub outing: Outing,
    /// Includes the responsible professor.
    pub professor_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOuting {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub group_id: Option<DbId>,
    pub location: Option<String>,
    pub responsible_professor_id: DbId,
    /// Accompanying professors. The responsible professor is always added.
    #[serde(default)]
    pub professor_ids: Vec<DbId>,
}

/// `professor_ids`, when present, replaces the accompanying list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOuting {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub group_id: Option<DbId>,
    pub location: Option<String>,
    pub responsible_professor_id: Option<DbId>,
    pub professor_ids: Option<Vec<DbId>>,
}

/// A professor kept away by an outing on a given date.
#[derive(Debug, Clone, FromRow)]
pub struct OutingAbsence {
    pub outing_id: DbId,
    pub professor_id: DbId,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}
