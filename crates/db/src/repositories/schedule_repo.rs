//! Repository for the `schedules` table.

use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::schedule::{CreateSchedule, Schedule, UpdateSchedule};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, professor_id, weekday, start_time, end_time, subject_code, \
                       group_name, room, created_at, updated_at";

/// Weekly timetable rows.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Insert a slot. Subject codes are stored upper-case.
    pub async fn create(pool: &PgPool, input: &CreateSchedule) -> Result<Schedule, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedules (professor_id, weekday, start_time, end_time, subject_code, group_name, room)
             VALUES ($1, $2, $3, $4, UPPER($5), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(input.professor_id)
            .bind(input.weekday)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.subject_code.trim())
            .bind(&input.group_name)
            .bind(&input.room)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Schedule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM schedules WHERE id = $1");
        sqlx::query_as::<_, Schedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List slots, optionally filtered by professor and/or weekday.
    pub async fn list(
        pool: &PgPool,
        professor_id: Option<DbId>,
        weekday: Option<i16>,
    ) -> Result<Vec<Schedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedules
             WHERE ($1::BIGINT IS NULL OR professor_id = $1)
               AND ($2::SMALLINT IS NULL OR weekday = $2)
             ORDER BY weekday, start_time, professor_id"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(professor_id)
            .bind(weekday)
            .fetch_all(pool)
            .await
    }

    /// Every slot of every non-deleted professor. Feeds the ranking.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Schedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedules
             WHERE professor_id IN (SELECT id FROM professors WHERE deleted_at IS NULL)
             ORDER BY professor_id, weekday, start_time"
        );
        sqlx::query_as::<_, Schedule>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSchedule,
    ) -> Result<Option<Schedule>, sqlx::Error> {
        let query = format!(
            "UPDATE schedules SET
                professor_id = COALESCE($2, professor_id),
                weekday = COALESCE($3, weekday),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                subject_code = COALESCE(UPPER($6), subject_code),
                group_name = COALESCE($7, group_name),
                room = COALESCE($8, room)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(id)
            .bind(input.professor_id)
            .bind(input.weekday)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.subject_code.as_deref().map(str::trim))
            .bind(&input.group_name)
            .bind(&input.room)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
