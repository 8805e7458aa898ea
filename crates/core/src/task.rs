//! Task status rules and attachment naming.

use crate::error::CoreError;

pub const TASK_STATUS_PENDING: i16 = 1;
pub const TASK_STATUS_IN_PROGRESS: i16 = 2;
pub const TASK_STATUS_DONE: i16 = 3;

/// Maximum stored length of an attachment file name.
pub const MAX_ATTACHMENT_NAME_LEN: usize = 255;

/// Status ids reachable from `from`. A finished task must be reopened
/// (back to Pending) before work resumes on it.
pub fn valid_task_transitions(from: i16) -> &'static [i16] {
    match from {
        TASK_STATUS_PENDING => &[TASK_STATUS_IN_PROGRESS, TASK_STATUS_DONE],
        TASK_STATUS_IN_PROGRESS => &[TASK_STATUS_PENDING, TASK_STATUS_DONE],
        TASK_STATUS_DONE => &[TASK_STATUS_PENDING],
        _ => &[],
    }
}

pub fn validate_task_transition(from: i16, to: i16) -> Result<(), CoreError> {
    if from == to || valid_task_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Invalid task transition: {from} -> {to}"
        )))
    }
}

/// Strip directory components and control characters from an uploaded file
/// name. Falls back to `"attachment"` when nothing usable is left.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .chars()
        .take(MAX_ATTACHMENT_NAME_LEN)
        .collect();

    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned
    }
}
