//! Repository for the `guard_assignments` table.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use guardies_core::ranking::BusyInterval;
use guardies_core::schedule::TimeRange;
use guardies_core::types::DbId;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::models::assignment::{CreateAssignment, GuardAssignment, ReassignAssignment};
use crate::models::status::{AssignmentStatus, GuardStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, guard_id, professor_id, priority, status_id, reason, assigned_at, \
                       created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BusyRow {
    professor_id: DbId,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

/// Which professor covers which guard.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Assign a professor to a pending guard and move the guard to assigned,
    /// atomically.
    ///
    /// Returns `None` (and changes nothing) if the guard is not pending.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssignment,
    ) -> Result<Option<GuardAssignment>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let created = Self::create_in_tx(&mut tx, input).await?;
        if created.is_some() {
            tx.commit().await?;
        }
        Ok(created)
    }

    /// Apply a batch of assignments in one transaction. Guards that are no
    /// longer pending are skipped.
    pub async fn create_batch(
        pool: &PgPool,
        inputs: &[CreateAssignment],
    ) -> Result<Vec<GuardAssignment>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            match Self::create_in_tx(&mut tx, input).await? {
                Some(assignment) => created.push(assignment),
                None => tracing::debug!(guard_id = input.guard_id, "Guard no longer pending, skipped"),
            }
        }
        tx.commit().await?;
        Ok(created)
    }

    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateAssignment,
    ) -> Result<Option<GuardAssignment>, sqlx::Error> {
        let moved = sqlx::query("UPDATE guards SET status_id = $2 WHERE id = $1 AND status_id = $3")
            .bind(input.guard_id)
            .bind(GuardStatus::Assigned.id())
            .bind(GuardStatus::Pending.id())
            .execute(&mut **tx)
            .await?;
        if moved.rows_affected() == 0 {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO guard_assignments (guard_id, professor_id, priority, status_id, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let assignment = sqlx::query_as::<_, GuardAssignment>(&query)
            .bind(input.guard_id)
            .bind(input.professor_id)
            .bind(input.priority)
            .bind(AssignmentStatus::Active.id())
            .bind(&input.reason)
            .fetch_one(&mut **tx)
            .await?;
        Ok(Some(assignment))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GuardAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guard_assignments WHERE id = $1");
        sqlx::query_as::<_, GuardAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The assignment of a guard, whatever its status.
    pub async fn find_by_guard(
        pool: &PgPool,
        guard_id: DbId,
    ) -> Result<Option<GuardAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guard_assignments WHERE guard_id = $1");
        sqlx::query_as::<_, GuardAssignment>(&query)
            .bind(guard_id)
            .fetch_optional(pool)
            .await
    }

    /// List assignments, optionally filtered by guard and/or professor.
    pub async fn list(
        pool: &PgPool,
        guard_id: Option<DbId>,
        professor_id: Option<DbId>,
    ) -> Result<Vec<GuardAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guard_assignments
             WHERE ($1::BIGINT IS NULL OR guard_id = $1)
               AND ($2::BIGINT IS NULL OR professor_id = $2)
             ORDER BY assigned_at DESC, id DESC"
        );
        sqlx::query_as::<_, GuardAssignment>(&query)
            .bind(guard_id)
            .bind(professor_id)
            .fetch_all(pool)
            .await
    }

    /// Change professor, priority or reason of an active assignment.
    ///
    /// Returns `None` if the assignment does not exist or is completed.
    pub async fn reassign(
        pool: &PgPool,
        id: DbId,
        input: &ReassignAssignment,
    ) -> Result<Option<GuardAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE guard_assignments SET
                professor_id = COALESCE($2, professor_id),
                priority = COALESCE($3, priority),
                reason = COALESCE($4, reason),
                assigned_at = CASE WHEN $2 IS NULL THEN assigned_at ELSE NOW() END
             WHERE id = $1 AND status_id = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuardAssignment>(&query)
            .bind(id)
            .bind(input.professor_id)
            .bind(input.priority)
            .bind(&input.reason)
            .bind(AssignmentStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// Guard duties per professor over all time, active and completed.
    pub async fn guard_counts(pool: &PgPool) -> Result<HashMap<DbId, i64>, sqlx::Error> {
        let rows: Vec<(DbId, i64)> = sqlx::query_as(
            "SELECT professor_id, COUNT(*) FROM guard_assignments GROUP BY professor_id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Whether `professor_id` already covers a guard overlapping
    /// `range` on `date`, leaving `except_guard` out.
    ///
    /// Takes any executor so it can run inside the transaction that is
    /// about to add another assignment.
    pub async fn covers_overlapping<'e>(
        executor: impl PgExecutor<'e>,
        professor_id: DbId,
        date: NaiveDate,
        range: &TimeRange,
        except_guard: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM guard_assignments a
                JOIN guards g ON g.id = a.guard_id
                WHERE a.professor_id = $1
                  AND g.date = $2
                  AND g.start_time < $4
                  AND g.end_time > $3
                  AND ($5::BIGINT IS NULL OR g.id <> $5)
             )",
        )
        .bind(professor_id)
        .bind(date)
        .bind(range.start)
        .bind(range.end)
        .bind(except_guard)
        .fetch_one(executor)
        .await
    }

    /// Intervals on `date` during which professors already cover a guard.
    pub async fn busy_on(pool: &PgPool, date: NaiveDate) -> Result<Vec<BusyInterval>, sqlx::Error> {
        let rows = sqlx::query_as::<_, BusyRow>(
            "SELECT a.professor_id, g.date, g.start_time, g.end_time
             FROM guard_assignments a
             JOIN guards g ON g.id = a.guard_id
             WHERE g.date = $1",
        )
        .bind(date)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| BusyInterval {
                professor_id: r.professor_id,
                date: r.date,
                range: TimeRange {
                    start: r.start_time,
                    end: r.end_time,
                },
            })
            .collect())
    }
}
