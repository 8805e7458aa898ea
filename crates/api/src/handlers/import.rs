//! Handlers for `/import/csv`: bulk loading of reference data, timetables
//! and guards from CSV files.
//!
//! The file is parsed first (a missing required column rejects the whole
//! file). Each valid row is then inserted on its own, so a duplicate or an
//! unknown reference only turns that row into a [`RowError`].

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use guardies_core::csv_import::{parse_import, ImportEntity, ImportRecord, RowError};
use guardies_core::schedule::is_guard_code;
use guardies_core::types::DbId;
use guardies_db::models::classroom::CreateClassroom;
use guardies_db::models::group::CreateGroup;
use guardies_db::models::guard::CreateGuard;
use guardies_db::models::professor::CreateProfessor;
use guardies_db::models::schedule::CreateSchedule;
use guardies_db::models::student::CreateStudent;
use guardies_db::models::subject::CreateSubject;
use guardies_db::repositories::{
    ClassroomRepo, GroupRepo, GuardRepo, ProfessorRepo, ScheduleRepo, StudentRepo, SubjectRepo,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportParams {
    pub entity: ImportEntity,
}

/// Outcome of one import.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub entity: ImportEntity,
    /// Data rows in the file (header excluded).
    pub total_rows: usize,
    pub imported: usize,
    pub errors: Vec<RowError>,
}

/// Expected headers for one entity.
#[derive(Debug, Serialize)]
pub struct ImportColumns {
    pub entity: ImportEntity,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

/// Why a single row could not be stored.
enum RowFailure {
    /// Reported back to the caller as a row error.
    Rejected(String),
    /// The database itself failed; aborts the import.
    Fatal(sqlx::Error),
}

impl From<sqlx::Error> for RowFailure {
    /// Constraint violations are the row's fault; anything else is not.
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.constraint() {
                Some(constraint) if constraint.starts_with("uq_") => {
                    RowFailure::Rejected(format!("Duplicate row ({constraint})"))
                }
                Some(constraint) => {
                    RowFailure::Rejected(format!("Row violates {constraint}"))
                }
                None => RowFailure::Fatal(err),
            },
            _ => RowFailure::Fatal(err),
        }
    }
}

/// Caches name → id lookups across the rows of one file.
#[derive(Default)]
struct References {
    professors: HashMap<String, Option<DbId>>,
    groups: HashMap<String, Option<DbId>>,
}

impl References {
    async fn professor(&mut self, pool: &PgPool, email: &str) -> Result<Option<DbId>, sqlx::Error> {
        if let Some(id) = self.professors.get(email) {
            return Ok(*id);
        }
        let id = ProfessorRepo::find_by_email(pool, email).await?.map(|p| p.id);
        self.professors.insert(email.to_string(), id);
        Ok(id)
    }

    async fn group(&mut self, pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        if let Some(id) = self.groups.get(name) {
            return Ok(*id);
        }
        let id = GroupRepo::find_by_name(pool, name).await?.map(|g| g.id);
        self.groups.insert(name.to_string(), id);
        Ok(id)
    }
}

async fn import_record(
    pool: &PgPool,
    refs: &mut References,
    record: ImportRecord,
) -> Result<(), RowFailure> {
    match record {
        ImportRecord::Professor(r) => {
            ProfessorRepo::create(
                pool,
                &CreateProfessor {
                    name: r.name,
                    surname: r.surname,
                    email: r.email,
                    role: Some(r.role),
                    department: None,
                    password_hash: None,
                },
            )
            .await?;
        }
        ImportRecord::Student(r) => {
            let group_id = match &r.group {
                Some(name) => Some(refs.group(pool, name).await?.ok_or_else(|| {
                    RowFailure::Rejected(format!("Unknown group '{name}'"))
                })?),
                None => None,
            };
            StudentRepo::create(
                pool,
                &CreateStudent {
                    name: r.name,
                    surname: r.surname,
                    email: r.email,
                    group_id,
                },
            )
            .await?;
        }
        ImportRecord::Group(r) => {
            GroupRepo::create(
                pool,
                &CreateGroup {
                    name: r.name,
                    level: r.level,
                    academic_year_id: None,
                },
            )
            .await?;
        }
        ImportRecord::Classroom(r) => {
            ClassroomRepo::create(
                pool,
                &CreateClassroom {
                    name: r.name,
                    capacity: r.capacity,
                    building: r.building,
                },
            )
            .await?;
        }
        ImportRecord::Subject(r) => {
            if is_guard_code(&r.code) {
                return Err(RowFailure::Rejected(format!(
                    "Subject code '{}' is reserved for guard hours",
                    r.code
                )));
            }
            SubjectRepo::create(
                pool,
                &CreateSubject {
                    code: r.code,
                    name: r.name,
                },
            )
            .await?;
        }
        ImportRecord::Schedule(r) => {
            let professor_id = refs
                .professor(pool, &r.professor_email)
                .await?
                .ok_or_else(|| {
                    RowFailure::Rejected(format!("Unknown professor '{}'", r.professor_email))
                })?;
            ScheduleRepo::create(
                pool,
                &CreateSchedule {
                    professor_id,
                    weekday: r.weekday,
                    start_time: r.range.start,
                    end_time: r.range.end,
                    subject_code: r.subject_code,
                    group_name: r.group,
                    room: r.room,
                },
            )
            .await?;
        }
        ImportRecord::Guard(r) => {
            GuardRepo::create(
                pool,
                &CreateGuard {
                    date: r.date,
                    start_time: r.range.start,
                    end_time: r.range.end,
                    guard_type: r.guard_type,
                    location: r.location,
                    notes: r.notes,
                    outing_id: None,
                    absent_professor_id: None,
                },
            )
            .await?;
        }
    }
    Ok(())
}

/// POST /api/import/csv?entity=<name>
///
/// The request body is the raw CSV file.
pub async fn import_csv(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    body: Bytes,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("CSV body is empty".into()));
    }
    let parsed = parse_import(params.entity, &body)?;
    let total_rows = parsed.total_rows();
    let mut errors = parsed.errors;
    let mut imported = 0;
    let mut refs = References::default();

    for (row, record) in parsed.records {
        match import_record(&state.pool, &mut refs, record).await {
            Ok(()) => imported += 1,
            Err(RowFailure::Rejected(message)) => errors.push(RowError { row, message }),
            Err(RowFailure::Fatal(e)) => return Err(e.into()),
        }
    }
    errors.sort_by_key(|e| e.row);

    tracing::info!(
        entity = ?params.entity,
        total_rows,
        imported,
        failed = errors.len(),
        professor_id = user.professor_id,
        "CSV import finished"
    );

    Ok(Json(DataResponse {
        data: ImportReport {
            entity: params.entity,
            total_rows,
            imported,
            errors,
        },
    }))
}

/// GET /api/import/csv/columns
pub async fn columns(RequireAuth(_user): RequireAuth) -> Json<DataResponse<Vec<ImportColumns>>> {
    let columns = ImportEntity::ALL
        .into_iter()
        .map(|entity| ImportColumns {
            entity,
            required: entity.required_headers(),
            optional: entity.optional_headers(),
        })
        .collect();
    Json(DataResponse { data: columns })
}
