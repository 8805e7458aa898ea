//! Classroom model and DTOs.

use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Classroom {
    pub id: DbId,
    pub name: String,
    pub capacity: Option<i32>,
    pub building: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassroom {
    pub name: String,
    pub capacity: Option<i32>,
    pub building: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClassroom {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub building: Option<String>,
}
