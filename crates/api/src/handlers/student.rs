//! Handlers for the `/alumnes` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::types::DbId;
use guardies_core::validation::{validate_email, validate_non_empty};
use guardies_db::models::student::{CreateStudent, Student, UpdateStudent};
use guardies_db::repositories::StudentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::GroupFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn student_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Student",
        id,
    })
}

/// POST /api/alumnes
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<DataResponse<Student>>)> {
    validate_non_empty("name", &input.name)?;
    validate_non_empty("surname", &input.surname)?;
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    let student = StudentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// GET /api/alumnes?group_id=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<GroupFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Student>>>> {
    let students = StudentRepo::list(&state.pool, params.group_id).await?;
    Ok(Json(DataResponse { data: students }))
}

/// GET /api/alumnes/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Student>>> {
    let student = StudentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| student_not_found(id))?;
    Ok(Json(DataResponse { data: student }))
}

/// PUT /api/alumnes/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStudent>,
) -> AppResult<Json<DataResponse<Student>>> {
    if let Some(name) = &input.name {
        validate_non_empty("name", name)?;
    }
    if let Some(surname) = &input.surname {
        validate_non_empty("surname", surname)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    let student = StudentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| student_not_found(id))?;
    Ok(Json(DataResponse { data: student }))
}

/// DELETE /api/alumnes/{id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if StudentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(student_not_found(id))
    }
}
