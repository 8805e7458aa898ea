//! Repository for the `professor_sessions` table.

use guardies_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, ProfessorSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, professor_id, refresh_token_hash, expires_at, is_revoked, created_at, updated_at";

/// Refresh-token sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<ProfessorSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO professor_sessions (professor_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfessorSession>(&query)
            .bind(input.professor_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live session (not revoked, not expired) by refresh token hash.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<ProfessorSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM professor_sessions
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, ProfessorSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session. Returns `true` if the row was updated.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE professor_sessions SET is_revoked = true WHERE id = $1 AND is_revoked = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live session of a professor. Returns the count revoked.
    pub async fn revoke_all_for_professor(
        pool: &PgPool,
        professor_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE professor_sessions SET is_revoked = true
             WHERE professor_id = $1 AND is_revoked = false",
        )
        .bind(professor_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
