//! Domain error type shared by every crate in the workspace.

use crate::types::DbId;

/// Errors raised by domain rules. The API layer maps each variant onto an
/// HTTP status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before touching the database (bad time range,
    /// unknown role, missing CSV header, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but clashes with current state, e.g. an
    /// illegal guard status transition.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }
}
