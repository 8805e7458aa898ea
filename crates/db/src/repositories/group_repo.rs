//! Repository for the `groups` table.

use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group, UpdateGroup};

const COLUMNS: &str = "id, name, level, academic_year_id, created_at, updated_at";

pub struct GroupRepo;

impl GroupRepo {
    pub async fn create(pool: &PgPool, input: &CreateGroup) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (name, level, academic_year_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(input.name.trim())
            .bind(&input.level)
            .bind(input.academic_year_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact name lookup, used to resolve group names in CSV imports.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE name = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups ORDER BY name");
        sqlx::query_as::<_, Group>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups SET
                name = COALESCE($2, name),
                level = COALESCE($3, level),
                academic_year_id = COALESCE($4, academic_year_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.level)
            .bind(input.academic_year_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
