//! Repository for the `substitutions` table.

use chrono::{NaiveDate, NaiveTime};
use guardies_core::guard::{AssignmentReason, GUARD_TYPE_SUBSTITUTION};
use guardies_core::schedule::TimeRange;
use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::CreateAssignment;
use crate::models::status::GuardStatus;
use crate::models::substitution::{ConfirmOutcome, Substitution, SubstitutionProposal};
use crate::repositories::AssignmentRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, outing_id, schedule_id, date, absent_professor_id, \
                       substitute_professor_id, guard_id, notes, confirmed_at, created_at, updated_at";

/// A proposal ready to become a guard, joined with its schedule slot.
#[derive(sqlx::FromRow)]
struct PendingCover {
    id: DbId,
    outing_id: DbId,
    date: NaiveDate,
    absent_professor_id: DbId,
    substitute_professor_id: DbId,
    start_time: NaiveTime,
    end_time: NaiveTime,
    subject_code: String,
    group_name: Option<String>,
    room: Option<String>,
}

/// Class covers proposed for outings.
pub struct SubstitutionRepo;

impl SubstitutionRepo {
    /// Insert or update the proposal for one class of an outing.
    ///
    /// The absent professor is read from the schedule row. Confirmed
    /// substitutions are left untouched, in which case `None` is returned.
    pub async fn upsert_proposal(
        pool: &PgPool,
        outing_id: DbId,
        input: &SubstitutionProposal,
    ) -> Result<Option<Substitution>, sqlx::Error> {
        let query = format!(
            "INSERT INTO substitutions
                (outing_id, schedule_id, date, absent_professor_id, substitute_professor_id, notes)
             SELECT $1, s.id, $3, s.professor_id, $4, $5
             FROM schedules s WHERE s.id = $2
             ON CONFLICT ON CONSTRAINT uq_substitutions_outing_slot DO UPDATE SET
                substitute_professor_id = EXCLUDED.substitute_professor_id,
                notes = EXCLUDED.notes
             WHERE substitutions.confirmed_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Substitution>(&query)
            .bind(outing_id)
            .bind(input.schedule_id)
            .bind(input.date)
            .bind(input.substitute_professor_id)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Proposals of an outing in class order.
    pub async fn list_by_outing(
        pool: &PgPool,
        outing_id: DbId,
    ) -> Result<Vec<Substitution>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM substitutions s
             WHERE s.outing_id = $1
             ORDER BY s.date,
                      (SELECT start_time FROM schedules WHERE id = s.schedule_id),
                      s.absent_professor_id,
                      s.id"
        );
        sqlx::query_as::<_, Substitution>(&query)
            .bind(outing_id)
            .fetch_all(pool)
            .await
    }

    /// Turn every unconfirmed proposal that names a substitute into a
    /// `substitucio` guard assigned to that substitute (reason `sortida`),
    /// then stamp the outing as confirmed. All in one transaction.
    ///
    /// A substitute who already covers an overlapping guard (including one
    /// created earlier in this same call) aborts the whole confirmation.
    pub async fn confirm_all(pool: &PgPool, outing_id: DbId) -> Result<ConfirmOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let pending = sqlx::query_as::<_, PendingCover>(
            "SELECT sub.id, sub.outing_id, sub.date, sub.absent_professor_id,
                    sub.substitute_professor_id, s.start_time, s.end_time,
                    s.subject_code, s.group_name, s.room
             FROM substitutions sub
             JOIN schedules s ON s.id = sub.schedule_id
             WHERE sub.outing_id = $1
               AND sub.confirmed_at IS NULL
               AND sub.substitute_professor_id IS NOT NULL
             ORDER BY sub.date, s.start_time, sub.id
             FOR UPDATE OF sub",
        )
        .bind(outing_id)
        .fetch_all(&mut *tx)
        .await?;

        let reason = AssignmentReason::Sortida;
        let mut confirmed = Vec::with_capacity(pending.len());

        for cover in pending {
            let range = TimeRange {
                start: cover.start_time,
                end: cover.end_time,
            };
            if AssignmentRepo::covers_overlapping(
                &mut *tx,
                cover.substitute_professor_id,
                cover.date,
                &range,
                None,
            )
            .await?
            {
                tracing::debug!(
                    outing_id,
                    substitution_id = cover.id,
                    professor_id = cover.substitute_professor_id,
                    "Substitute already busy, confirmation rolled back"
                );
                return Ok(ConfirmOutcome::SubstituteBusy {
                    substitution_id: cover.id,
                    professor_id: cover.substitute_professor_id,
                    date: cover.date,
                });
            }

            let notes = match &cover.group_name {
                Some(group) => format!("{} ({group})", cover.subject_code),
                None => cover.subject_code.clone(),
            };
            let guard_id: DbId = sqlx::query_scalar(
                "INSERT INTO guards
                    (date, start_time, end_time, guard_type, status_id, location, notes,
                     outing_id, absent_professor_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 RETURNING id",
            )
            .bind(cover.date)
            .bind(cover.start_time)
            .bind(cover.end_time)
            .bind(GUARD_TYPE_SUBSTITUTION)
            .bind(GuardStatus::Pending.id())
            .bind(&cover.room)
            .bind(notes)
            .bind(cover.outing_id)
            .bind(cover.absent_professor_id)
            .fetch_one(&mut *tx)
            .await?;

            // Moves the fresh guard from pending to assigned.
            AssignmentRepo::create_in_tx(
                &mut tx,
                &CreateAssignment {
                    guard_id,
                    professor_id: cover.substitute_professor_id,
                    priority: reason.default_priority(),
                    reason: reason.code().to_string(),
                },
            )
            .await?;

            let query = format!(
                "UPDATE substitutions SET guard_id = $2, confirmed_at = NOW()
                 WHERE id = $1
                 RETURNING {COLUMNS}"
            );
            let substitution = sqlx::query_as::<_, Substitution>(&query)
                .bind(cover.id)
                .bind(guard_id)
                .fetch_one(&mut *tx)
                .await?;
            confirmed.push(substitution);
        }

        sqlx::query("UPDATE outings SET substitutions_confirmed_at = NOW() WHERE id = $1")
            .bind(outing_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(outing_id, confirmed = confirmed.len(), "Substitutions confirmed");
        Ok(ConfirmOutcome::Confirmed(confirmed))
    }
}
