//! Student model and DTOs.

use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub group_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub group_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudent {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub group_id: Option<DbId>,
}
