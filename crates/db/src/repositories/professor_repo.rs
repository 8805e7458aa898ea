//! Repository for the `professors` table.

use guardies_core::roles::ROLE_PROFESSOR;
use guardies_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::professor::{CreateProfessor, Professor, ProfessorCredentials, UpdateProfessor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, surname, email, role, department, last_login_at, created_at, updated_at";

const CREDENTIAL_COLUMNS: &str =
    "id, email, role, password_hash, failed_login_count, locked_until";

/// Provides CRUD and login bookkeeping for professors.
pub struct ProfessorRepo;

impl ProfessorRepo {
    /// Insert a new professor, returning the created row.
    ///
    /// If `role` is `None` in the input, defaults to `professor`.
    pub async fn create(pool: &PgPool, input: &CreateProfessor) -> Result<Professor, sqlx::Error> {
        let query = format!(
            "INSERT INTO professors (name, surname, email, role, department, password_hash)
             VALUES ($1, $2, $3, COALESCE($4, '{ROLE_PROFESSOR}'), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Professor>(&query)
            .bind(input.name.trim())
            .bind(input.surname.trim())
            .bind(input.email.trim())
            .bind(&input.role)
            .bind(&input.department)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a professor by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Professor>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM professors WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Professor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive email lookup. Excludes soft-deleted rows.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Professor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM professors
             WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Professor>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// List professors ordered by surname then name. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Professor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM professors WHERE deleted_at IS NULL ORDER BY surname, name, id"
        );
        sqlx::query_as::<_, Professor>(&query).fetch_all(pool).await
    }

    /// IDs of every professor who can be given guard duty.
    pub async fn list_active_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM professors WHERE deleted_at IS NULL ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Update a professor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfessor,
    ) -> Result<Option<Professor>, sqlx::Error> {
        let query = format!(
            "UPDATE professors SET
                name = COALESCE($2, name),
                surname = COALESCE($3, surname),
                email = COALESCE($4, email),
                role = COALESCE($5, role),
                department = COALESCE($6, department)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Professor>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.surname.as_deref().map(str::trim))
            .bind(input.email.as_deref().map(str::trim))
            .bind(&input.role)
            .bind(&input.department)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a professor by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE professors SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Credentials
    // -----------------------------------------------------------------------

    /// Login lookup by email. Excludes soft-deleted rows.
    pub async fn find_credentials_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<ProfessorCredentials>, sqlx::Error> {
        let query = format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM professors
             WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, ProfessorCredentials>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// Replace the password hash. Returns `true` if the professor exists.
    pub async fn set_password(pool: &PgPool, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE professors SET password_hash = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reset the failure counter and stamp `last_login_at`.
    pub async fn record_login_success(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE professors
             SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Count a failed login. Once the count reaches `max_attempts` the account
    /// is locked until `lock_until` and the counter restarts.
    pub async fn record_login_failure(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE professors SET
                locked_until = CASE WHEN failed_login_count + 1 >= $2 THEN $3 ELSE locked_until END,
                failed_login_count = CASE WHEN failed_login_count + 1 >= $2 THEN 0
                                          ELSE failed_login_count + 1 END
             WHERE id = $1",
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_until)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Number of professors that have a password and can log in.
    pub async fn count_with_login(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM professors WHERE password_hash IS NOT NULL AND deleted_at IS NULL",
        )
        .fetch_one(pool)
        .await
    }
}
