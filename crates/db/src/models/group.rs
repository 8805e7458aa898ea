//! Class group model and DTOs.

use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A class group (e.g. `1r ESO A`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub level: Option<String>,
    pub academic_year_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub level: Option<String>,
    pub academic_year_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub level: Option<String>,
    pub academic_year_id: Option<DbId>,
}
