//! Handlers for the `/materies` resource. Subject codes are stored
//! uppercase; `G` is reserved for guard hours in timetables.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::schedule::is_guard_code;
use guardies_core::types::DbId;
use guardies_core::validation::validate_non_empty;
use guardies_db::models::subject::{CreateSubject, Subject, UpdateSubject};
use guardies_db::repositories::SubjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn subject_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Subject",
        id,
    })
}

fn validate_code(code: &str) -> Result<(), CoreError> {
    validate_non_empty("code", code)?;
    if is_guard_code(code) {
        return Err(CoreError::validation(format!(
            "Subject code '{code}' is reserved for guard hours"
        )));
    }
    Ok(())
}

/// POST /api/materies
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateSubject>,
) -> AppResult<(StatusCode, Json<DataResponse<Subject>>)> {
    validate_code(&input.code)?;
    validate_non_empty("name", &input.name)?;
    let subject = SubjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: subject })))
}

/// GET /api/materies
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Subject>>>> {
    let subjects = SubjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: subjects }))
}

/// GET /api/materies/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subject>>> {
    let subject = SubjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| subject_not_found(id))?;
    Ok(Json(DataResponse { data: subject }))
}

/// PUT /api/materies/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubject>,
) -> AppResult<Json<DataResponse<Subject>>> {
    if let Some(code) = &input.code {
        validate_code(code)?;
    }
    if let Some(name) = &input.name {
        validate_non_empty("name", name)?;
    }
    let subject = SubjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| subject_not_found(id))?;
    Ok(Json(DataResponse { data: subject }))
}

/// DELETE /api/materies/{id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SubjectRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(subject_not_found(id))
    }
}
