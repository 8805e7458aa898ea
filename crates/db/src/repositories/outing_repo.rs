//! Repository for the `outings` and `outing_professors` tables.

use std::collections::HashMap;

use chrono::NaiveDate;
use guardies_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::outing::{CreateOuting, Outing, OutingAbsence, OutingWithProfessors, UpdateOuting};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, start_date, end_date, start_time, end_time, \
                       group_id, location, responsible_professor_id, substitutions_confirmed_at, \
                       created_at, updated_at";

/// Outings and the professors away on them.
pub struct OutingRepo;

impl OutingRepo {
    /// Insert an outing and its professors. The responsible professor is
    /// always part of the list.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOuting,
    ) -> Result<OutingWithProfessors, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO outings
                (name, description, start_date, end_date, start_time, end_time,
                 group_id, location, responsible_professor_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let outing = sqlx::query_as::<_, Outing>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.group_id)
            .bind(&input.location)
            .bind(input.responsible_professor_id)
            .fetch_one(&mut *tx)
            .await?;

        let mut ids = input.professor_ids.clone();
        ids.push(outing.responsible_professor_id);
        let professor_ids = Self::replace_professors(&mut tx, outing.id, &ids).await?;

        tx.commit().await?;
        Ok(OutingWithProfessors {
            outing,
            professor_ids,
        })
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OutingWithProfessors>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outings WHERE id = $1");
        let Some(outing) = sqlx::query_as::<_, Outing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let professor_ids = Self::professor_ids(pool, id).await?;
        Ok(Some(OutingWithProfessors {
            outing,
            professor_ids,
        }))
    }

    /// All outings, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<OutingWithProfessors>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outings ORDER BY start_date DESC, id DESC");
        let outings = sqlx::query_as::<_, Outing>(&query).fetch_all(pool).await?;

        let pairs: Vec<(DbId, DbId)> = sqlx::query_as(
            "SELECT outing_id, professor_id FROM outing_professors ORDER BY outing_id, professor_id",
        )
        .fetch_all(pool)
        .await?;

        let mut by_outing: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (outing_id, professor_id) in pairs {
            by_outing.entry(outing_id).or_default().push(professor_id);
        }

        Ok(outings
            .into_iter()
            .map(|outing| OutingWithProfessors {
                professor_ids: by_outing.remove(&outing.id).unwrap_or_default(),
                outing,
            })
            .collect())
    }

    /// Update an outing. When `professor_ids` is given it replaces the list;
    /// the responsible professor is kept on it either way.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOuting,
    ) -> Result<Option<OutingWithProfessors>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE outings SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                start_time = COALESCE($6, start_time),
                end_time = COALESCE($7, end_time),
                group_id = COALESCE($8, group_id),
                location = COALESCE($9, location),
                responsible_professor_id = COALESCE($10, responsible_professor_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(outing) = sqlx::query_as::<_, Outing>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.group_id)
            .bind(&input.location)
            .bind(input.responsible_professor_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut ids = match &input.professor_ids {
            Some(ids) => ids.clone(),
            None => sqlx::query_scalar(
                "SELECT professor_id FROM outing_professors WHERE outing_id = $1",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?,
        };
        ids.push(outing.responsible_professor_id);
        let professor_ids = Self::replace_professors(&mut tx, id, &ids).await?;

        tx.commit().await?;
        Ok(Some(OutingWithProfessors {
            outing,
            professor_ids,
        }))
    }

    /// Delete an outing with its substitutions and generated guards.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM outings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Professors away on an outing, ascending.
    pub async fn professor_ids(pool: &PgPool, outing_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT professor_id FROM outing_professors WHERE outing_id = $1 ORDER BY professor_id",
        )
        .bind(outing_id)
        .fetch_all(pool)
        .await
    }

    /// Every professor kept away by some outing on `date`.
    pub async fn absences_on(pool: &PgPool, date: NaiveDate) -> Result<Vec<OutingAbsence>, sqlx::Error> {
        sqlx::query_as::<_, OutingAbsence>(
            "SELECT o.id AS outing_id, op.professor_id, o.start_time, o.end_time
             FROM outings o
             JOIN outing_professors op ON op.outing_id = o.id
             WHERE $1 BETWEEN o.start_date AND o.end_date",
        )
        .bind(date)
        .fetch_all(pool)
        .await
    }

    async fn replace_professors(
        tx: &mut Transaction<'_, Postgres>,
        outing_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        sqlx::query("DELETE FROM outing_professors WHERE outing_id = $1")
            .bind(outing_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO outing_professors (outing_id, professor_id)
             SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(outing_id)
        .bind(&ids)
        .execute(&mut **tx)
        .await?;

        Ok(ids)
    }
}
