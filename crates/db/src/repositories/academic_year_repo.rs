//! Repository for the `academic_years` table.

use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::academic_year::{AcademicYear, CreateAcademicYear, UpdateAcademicYear};

const COLUMNS: &str = "id, name, start_date, end_date, is_current, created_at, updated_at";

pub struct AcademicYearRepo;

impl AcademicYearRepo {
    /// Insert a year. When it is marked current, every other year is unmarked
    /// in the same transaction.
    pub async fn create(pool: &PgPool, input: &CreateAcademicYear) -> Result<AcademicYear, sqlx::Error> {
        let is_current = input.is_current.unwrap_or(false);
        let mut tx = pool.begin().await?;

        if is_current {
            sqlx::query("UPDATE academic_years SET is_current = false WHERE is_current")
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "INSERT INTO academic_years (name, start_date, end_date, is_current)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let year = sqlx::query_as::<_, AcademicYear>(&query)
            .bind(input.name.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(is_current)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(year)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AcademicYear>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM academic_years WHERE id = $1");
        sqlx::query_as::<_, AcademicYear>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent year first.
    pub async fn list(pool: &PgPool) -> Result<Vec<AcademicYear>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM academic_years ORDER BY start_date DESC");
        sqlx::query_as::<_, AcademicYear>(&query).fetch_all(pool).await
    }

    /// Update a year. Setting `is_current = true` unmarks the others.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAcademicYear,
    ) -> Result<Option<AcademicYear>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if input.is_current == Some(true) {
            sqlx::query("UPDATE academic_years SET is_current = false WHERE is_current AND id <> $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "UPDATE academic_years SET
                name = COALESCE($2, name),
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date),
                is_current = COALESCE($5, is_current)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let year = sqlx::query_as::<_, AcademicYear>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_current)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(year)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM academic_years WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
