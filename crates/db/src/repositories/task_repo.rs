//! Repository for the `tasks` table.

use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::status::{StatusId, TaskStatus};
use crate::models::task::{CreateTask, Task, UpdateTask};

const COLUMNS: &str = "id, title, description, status_id, due_date, assigned_professor_id, \
                       created_by, created_at, updated_at";

pub struct TaskRepo;

impl TaskRepo {
    /// Insert a pending task.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
        created_by: Option<DbId>,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, status_id, due_date, assigned_professor_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(TaskStatus::Pending.id())
            .bind(input.due_date)
            .bind(input.assigned_professor_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Open tasks first, then by due date (undated last).
    pub async fn list(
        pool: &PgPool,
        assigned_professor_id: Option<DbId>,
        status_id: Option<StatusId>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::BIGINT IS NULL OR assigned_professor_id = $1)
               AND ($2::SMALLINT IS NULL OR status_id = $2)
             ORDER BY status_id = {done}, due_date NULLS LAST, id",
            done = TaskStatus::Done.id()
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(assigned_professor_id)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status_id = COALESCE($4, status_id),
                due_date = COALESCE($5, due_date),
                assigned_professor_id = COALESCE($6, assigned_professor_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.status_id)
            .bind(input.due_date)
            .bind(input.assigned_professor_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task and its attachment rows. Files on disk are the caller's
    /// concern.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
