//! Guard duty constants, status state machine and assignment reasons.
//!
//! Status ids mirror the `guard_statuses` / `assignment_statuses` seed data
//! (1-based SMALLSERIAL). They are duplicated from the `db` crate's status
//! enums because `core` must have zero internal deps.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Guard types
// ---------------------------------------------------------------------------

pub const GUARD_TYPE_YARD: &str = "pati";
pub const GUARD_TYPE_LIBRARY: &str = "biblioteca";
pub const GUARD_TYPE_CLASSROOM: &str = "aula";
pub const GUARD_TYPE_CORRIDOR: &str = "passadis";
/// Class cover generated when substitutions for an outing are confirmed.
pub const GUARD_TYPE_SUBSTITUTION: &str = "substitucio";

pub const ALL_GUARD_TYPES: &[&str] = &[
    GUARD_TYPE_YARD,
    GUARD_TYPE_LIBRARY,
    GUARD_TYPE_CLASSROOM,
    GUARD_TYPE_CORRIDOR,
    GUARD_TYPE_SUBSTITUTION,
];

pub fn validate_guard_type(guard_type: &str) -> Result<(), CoreError> {
    if ALL_GUARD_TYPES.contains(&guard_type) {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Unknown guard type '{guard_type}'. Expected one of: {}",
            ALL_GUARD_TYPES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Guard status state machine
// ---------------------------------------------------------------------------

pub const GUARD_STATUS_PENDING: i16 = 1;
pub const GUARD_STATUS_ASSIGNED: i16 = 2;
pub const GUARD_STATUS_COMPLETED: i16 = 3;

pub mod state_machine {
    use super::{GUARD_STATUS_ASSIGNED, GUARD_STATUS_COMPLETED, GUARD_STATUS_PENDING};

    /// Status ids reachable from `from_status`. Completed is terminal.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            GUARD_STATUS_PENDING => &[GUARD_STATUS_ASSIGNED],
            GUARD_STATUS_ASSIGNED => &[GUARD_STATUS_COMPLETED],
            _ => &[],
        }
    }

    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: i16, to: i16) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid guard transition: {} ({from}) -> {} ({to})",
                status_name(from),
                status_name(to)
            ))
        }
    }

    pub fn status_name(id: i16) -> &'static str {
        match id {
            GUARD_STATUS_PENDING => "Pending",
            GUARD_STATUS_ASSIGNED => "Assigned",
            GUARD_STATUS_COMPLETED => "Completed",
            _ => "Unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

pub const ASSIGNMENT_STATUS_ACTIVE: i16 = 1;
pub const ASSIGNMENT_STATUS_COMPLETED: i16 = 2;

/// Highest assignment priority.
pub const PRIORITY_MIN: i16 = 1;
/// Lowest assignment priority.
pub const PRIORITY_MAX: i16 = 5;

pub fn validate_priority(priority: i16) -> Result<(), CoreError> {
    if (PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Priority must be between {PRIORITY_MIN} and {PRIORITY_MAX}, got {priority}"
        )))
    }
}

/// Why a professor was given a guard duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentReason {
    /// Covering a class left by a colleague on an outing.
    Sortida,
    /// The professor is free because a meeting was cancelled or moved.
    Reunio,
    /// Hours linked to an administrative role.
    Carrec,
    /// Load balancing across the staff.
    Equilibri,
}

impl AssignmentReason {
    pub const ALL: [AssignmentReason; 4] = [
        AssignmentReason::Sortida,
        AssignmentReason::Reunio,
        AssignmentReason::Carrec,
        AssignmentReason::Equilibri,
    ];

    /// Code stored in `guard_assignments.reason`.
    pub fn code(self) -> &'static str {
        match self {
            AssignmentReason::Sortida => "sortida",
            AssignmentReason::Reunio => "reunio",
            AssignmentReason::Carrec => "carrec",
            AssignmentReason::Equilibri => "equilibri",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Priority used when a caller does not provide one.
    pub fn default_priority(self) -> i16 {
        match self {
            AssignmentReason::Sortida => 1,
            AssignmentReason::Reunio => 2,
            AssignmentReason::Carrec => 3,
            AssignmentReason::Equilibri => 4,
        }
    }
}

impl std::fmt::Display for AssignmentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
