//! Staff communications (notices posted to the whole school or one group).

use crate::error::CoreError;

pub const KIND_GENERAL: &str = "general";
pub const KIND_NOTICE: &str = "avis";
pub const KIND_URGENT: &str = "urgent";

pub const ALL_KINDS: &[&str] = &[KIND_GENERAL, KIND_NOTICE, KIND_URGENT];

pub fn validate_kind(kind: &str) -> Result<(), CoreError> {
    if ALL_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Unknown communication kind '{kind}'. Expected one of: {}",
            ALL_KINDS.join(", ")
        )))
    }
}
