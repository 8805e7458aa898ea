//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use guardies_core::types::DbId;
use serde::Deserialize;

use crate::error::AppError;

/// `?from=&to=&status=` on `GET /guardies`.
#[derive(Debug, Deserialize)]
pub struct GuardListParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Status id (1 pending, 2 assigned, 3 completed).
    pub status: Option<i16>,
}

impl GuardListParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if to < from {
                return Err(AppError::BadRequest(format!(
                    "'to' ({to}) must not be before 'from' ({from})"
                )));
            }
        }
        Ok(())
    }
}

/// `?guardia_id=&professor_id=` on `GET /assignacions-guardia`.
#[derive(Debug, Deserialize)]
pub struct AssignmentListParams {
    pub guardia_id: Option<DbId>,
    pub professor_id: Option<DbId>,
}

/// `?professor_id=&weekday=` on `GET /horaris`.
#[derive(Debug, Deserialize)]
pub struct ScheduleListParams {
    pub professor_id: Option<DbId>,
    pub weekday: Option<i16>,
}

/// `?professor_id=&status=` on `GET /tasques`.
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub professor_id: Option<DbId>,
    pub status: Option<i16>,
}

/// `?group_id=` on list endpoints scoped to a class group.
#[derive(Debug, Deserialize)]
pub struct GroupFilterParams {
    pub group_id: Option<DbId>,
}
