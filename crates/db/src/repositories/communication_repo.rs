//! Repository for the `communications` table.

use guardies_core::communication::KIND_GENERAL;
use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::communication::{Communication, CreateCommunication, UpdateCommunication};

const COLUMNS: &str = "id, title, body, kind, author_professor_id, group_id, published_at, \
                       created_at, updated_at";

pub struct CommunicationRepo;

impl CommunicationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCommunication,
        author_professor_id: Option<DbId>,
    ) -> Result<Communication, sqlx::Error> {
        let query = format!(
            "INSERT INTO communications (title, body, kind, author_professor_id, group_id, published_at)
             VALUES ($1, $2, COALESCE($3, '{KIND_GENERAL}'), $4, $5, COALESCE($6, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Communication>(&query)
            .bind(input.title.trim())
            .bind(&input.body)
            .bind(&input.kind)
            .bind(author_professor_id)
            .bind(input.group_id)
            .bind(input.published_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Communication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM communications WHERE id = $1");
        sqlx::query_as::<_, Communication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first.
    pub async fn list(pool: &PgPool, group_id: Option<DbId>) -> Result<Vec<Communication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM communications
             WHERE ($1::BIGINT IS NULL OR group_id = $1)
             ORDER BY published_at DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Communication>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCommunication,
    ) -> Result<Option<Communication>, sqlx::Error> {
        let query = format!(
            "UPDATE communications SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                kind = COALESCE($4, kind),
                group_id = COALESCE($5, group_id),
                published_at = COALESCE($6, published_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Communication>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.body)
            .bind(&input.kind)
            .bind(input.group_id)
            .bind(input.published_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM communications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
