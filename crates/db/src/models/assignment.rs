//! Guard assignment model and DTOs.

use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from `guard_assignments`: which professor covers which guard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuardAssignment {
    pub id: DbId,
    pub guard_id: DbId,
    pub professor_id: DbId,
    /// 1 (highest) to 5.
    pub priority: i16,
    pub status_id: StatusId,
    /// One of `sortida`, `reunio`, `carrec`, `equilibri`.
    pub reason: String,
    pub assigned_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO. Reason and priority are resolved by the caller.
#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub guard_id: DbId,
    pub professor_id: DbId,
    pub priority: i16,
    pub reason: String,
}

/// Reassignment DTO. Only active assignments can be changed.
#[derive(Debug, Clone, Deserialize)]
pub struct ReassignAssignment {
    pub professor_id: Option<DbId>,
    pub priority: Option<i16>,
    pub reason: Option<String>,
}
