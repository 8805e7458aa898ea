//! Professor entity model and DTOs.

use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A professor row from the `professors` table, without credentials.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Professor {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Login-related columns. NEVER serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct ProfessorCredentials {
    pub id: DbId,
    pub email: String,
    pub role: String,
    pub password_hash: Option<String>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
}

/// DTO for creating a new professor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfessor {
    pub name: String,
    pub surname: String,
    pub email: String,
    /// Defaults to `professor` if omitted.
    pub role: Option<String>,
    pub department: Option<String>,
    /// Already-hashed password; set by the API layer, never read from JSON.
    #[serde(skip)]
    pub password_hash: Option<String>,
}

/// DTO for updating an existing professor. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfessor {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}
