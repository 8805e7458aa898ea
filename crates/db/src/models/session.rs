//! Professor session model and DTOs.

use guardies_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `professor_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfessorSession {
    pub id: DbId,
    pub professor_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
pub struct CreateSession {
    pub professor_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
