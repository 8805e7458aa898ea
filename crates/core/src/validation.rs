//! Field-level validation helpers shared by handlers and the CSV importer.

use chrono::{NaiveDate, NaiveTime};
use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length of free-text name fields (names, titles, locations).
pub const MAX_NAME_LEN: usize = 255;

/// Reject empty (after trimming) or overlong values.
pub fn validate_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::validation(format!(
            "{field} must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// A time range must start strictly before it ends.
pub fn validate_time_range(start: NaiveTime, end: NaiveTime) -> Result<(), CoreError> {
    if start >= end {
        return Err(CoreError::validation(format!(
            "Start time {start} must be before end time {end}"
        )));
    }
    Ok(())
}

/// A date range may be a single day but must not run backwards.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::validation(format!(
            "End date {end} must not be before start date {start}"
        )));
    }
    Ok(())
}
