//! Repository for the `classrooms` table.

use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::classroom::{Classroom, CreateClassroom, UpdateClassroom};

const COLUMNS: &str = "id, name, capacity, building, created_at, updated_at";

pub struct ClassroomRepo;

impl ClassroomRepo {
    pub async fn create(pool: &PgPool, input: &CreateClassroom) -> Result<Classroom, sqlx::Error> {
        let query = format!(
            "INSERT INTO classrooms (name, capacity, building)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Classroom>(&query)
            .bind(input.name.trim())
            .bind(input.capacity)
            .bind(&input.building)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Classroom>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classrooms WHERE id = $1");
        sqlx::query_as::<_, Classroom>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Classroom>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classrooms ORDER BY name");
        sqlx::query_as::<_, Classroom>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClassroom,
    ) -> Result<Option<Classroom>, sqlx::Error> {
        let query = format!(
            "UPDATE classrooms SET
                name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                building = COALESCE($4, building)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Classroom>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.capacity)
            .bind(&input.building)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
