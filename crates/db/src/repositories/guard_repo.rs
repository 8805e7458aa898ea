//! Repository for the `guards` table.

use chrono::NaiveDate;
use guardies_core::types::DbId;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::models::guard::{CreateGuard, Guard, UpdateGuard};
use crate::models::status::{AssignmentStatus, GuardStatus, StatusId};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, date, start_time, end_time, guard_type, status_id, location, notes, \
                       outing_id, absent_professor_id, created_at, updated_at";

/// Guard duties and their status.
pub struct GuardRepo;

impl GuardRepo {
    /// Insert a new guard in the pending state.
    pub async fn create(pool: &PgPool, input: &CreateGuard) -> Result<Guard, sqlx::Error> {
        let query = format!(
            "INSERT INTO guards
                (date, start_time, end_time, guard_type, status_id, location, notes,
                 outing_id, absent_professor_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guard>(&query)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.guard_type)
            .bind(GuardStatus::Pending.id())
            .bind(&input.location)
            .bind(&input.notes)
            .bind(input.outing_id)
            .bind(input.absent_professor_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Guard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guards WHERE id = $1");
        sqlx::query_as::<_, Guard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List guards in chronological order. Every filter is optional; `from`
    /// and `to` are inclusive.
    pub async fn list(
        pool: &PgPool,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        status_id: Option<StatusId>,
    ) -> Result<Vec<Guard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guards
             WHERE ($1::DATE IS NULL OR date >= $1)
               AND ($2::DATE IS NULL OR date <= $2)
               AND ($3::SMALLINT IS NULL OR status_id = $3)
             ORDER BY date, start_time, id"
        );
        sqlx::query_as::<_, Guard>(&query)
            .bind(from)
            .bind(to)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    /// Pending guards, on one date or on any date.
    pub async fn list_pending(
        pool: &PgPool,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Guard>, sqlx::Error> {
        Self::list(pool, date, date, Some(GuardStatus::Pending.id())).await
    }

    /// Update descriptive fields. `status_id` in the input is ignored; use
    /// [`GuardRepo::complete`] or `AssignmentRepo::create` to move status.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGuard,
    ) -> Result<Option<Guard>, sqlx::Error> {
        Self::update_fields(pool, id, input).await
    }

    /// Update descriptive fields and complete the guard in one transaction.
    ///
    /// Returns `None`, with nothing saved, if the guard does not exist or is
    /// not assigned.
    pub async fn update_and_complete(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGuard,
    ) -> Result<Option<Guard>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if Self::update_fields(&mut *tx, id, input).await?.is_none() {
            return Ok(None);
        }
        let guard = Self::complete_in_tx(&mut tx, id).await?;
        if guard.is_some() {
            tx.commit().await?;
        }
        Ok(guard)
    }

    async fn update_fields<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateGuard,
    ) -> Result<Option<Guard>, sqlx::Error> {
        let query = format!(
            "UPDATE guards SET
                date = COALESCE($2, date),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                guard_type = COALESCE($5, guard_type),
                location = COALESCE($6, location),
                notes = COALESCE($7, notes),
                absent_professor_id = COALESCE($8, absent_professor_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guard>(&query)
            .bind(id)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.guard_type)
            .bind(&input.location)
            .bind(&input.notes)
            .bind(input.absent_professor_id)
            .fetch_optional(executor)
            .await
    }

    /// Move an assigned guard to completed and complete its assignment.
    ///
    /// Returns `None` if the guard does not exist or is not assigned.
    pub async fn complete(pool: &PgPool, id: DbId) -> Result<Option<Guard>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let guard = Self::complete_in_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(guard)
    }

    async fn complete_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Guard>, sqlx::Error> {
        let query = format!(
            "UPDATE guards SET status_id = $2
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        let guard = sqlx::query_as::<_, Guard>(&query)
            .bind(id)
            .bind(GuardStatus::Completed.id())
            .bind(GuardStatus::Assigned.id())
            .fetch_optional(&mut **tx)
            .await?;

        if guard.is_some() {
            sqlx::query(
                "UPDATE guard_assignments SET status_id = $2
                 WHERE guard_id = $1 AND status_id = $3",
            )
            .bind(id)
            .bind(AssignmentStatus::Completed.id())
            .bind(AssignmentStatus::Active.id())
            .execute(&mut **tx)
            .await?;
        }
        Ok(guard)
    }

    /// Delete a guard; its assignment goes with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM guards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
