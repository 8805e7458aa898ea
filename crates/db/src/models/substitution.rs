//! Outing substitution model and DTOs.

use chrono::NaiveDate;
use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A proposed or confirmed class cover for an outing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Substitution {
    pub id: DbId,
    pub outing_id: DbId,
    pub schedule_id: DbId,
    pub date: NaiveDate,
    pub absent_professor_id: DbId,
    pub substitute_professor_id: Option<DbId>,
    /// Guard created when the substitution was confirmed.
    pub guard_id: Option<DbId>,
    pub notes: Option<String>,
    pub confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One class cover proposal. The absent professor is taken from the
/// schedule row.
#[derive(Debug, Clone, Deserialize)]
pub struct SubstitutionProposal {
    pub schedule_id: DbId,
    pub date: NaiveDate,
    pub substitute_professor_id: Option<DbId>,
    pub notes: Option<String>,
}

/// Result of confirming an outing's proposals.
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// Every pending proposal became a guard; these are the rows confirmed.
    Confirmed(Vec<Substitution>),
    /// The substitute of `substitution_id` already covers a guard at that
    /// time. Nothing was confirmed.
    SubstituteBusy {
        substitution_id: DbId,
        professor_id: DbId,
        date: NaiveDate,
    },
}
