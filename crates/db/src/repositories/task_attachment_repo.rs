//! Repository for the `task_attachments` table.

use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTaskAttachment, TaskAttachment};

const COLUMNS: &str =
    "id, task_id, file_name, content_type, size_bytes, storage_path, uploaded_by, created_at";

pub struct TaskAttachmentRepo;

impl TaskAttachmentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTaskAttachment,
    ) -> Result<TaskAttachment, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_attachments
                (task_id, file_name, content_type, size_bytes, storage_path, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(input.task_id)
            .bind(&input.file_name)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(&input.storage_path)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Attachment `id` of task `task_id`.
    pub async fn find(
        pool: &PgPool,
        task_id: DbId,
        id: DbId,
    ) -> Result<Option<TaskAttachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_attachments WHERE id = $1 AND task_id = $2");
        sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(id)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_task(pool: &PgPool, task_id: DbId) -> Result<Vec<TaskAttachment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_attachments WHERE task_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Delete the row and return it so the caller can remove the file.
    pub async fn delete(
        pool: &PgPool,
        task_id: DbId,
        id: DbId,
    ) -> Result<Option<TaskAttachment>, sqlx::Error> {
        let query = format!(
            "DELETE FROM task_attachments WHERE id = $1 AND task_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(id)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }
}
