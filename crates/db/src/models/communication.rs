//! Communication model and DTOs.

use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A notice to staff, optionally scoped to one group.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Communication {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub author_professor_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommunication {
    pub title: String,
    pub body: String,
    /// Defaults to `general`.
    pub kind: Option<String>,
    pub group_id: Option<DbId>,
    /// Defaults to now.
    pub published_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommunication {
    pub title: Option<String>,
    pub body: Option<String>,
    pub kind: Option<String>,
    pub group_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
}
