//! Handlers for the `/aules` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::types::DbId;
use guardies_core::validation::validate_non_empty;
use guardies_db::models::classroom::{Classroom, CreateClassroom, UpdateClassroom};
use guardies_db::repositories::ClassroomRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn classroom_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Classroom",
        id,
    })
}

/// POST /api/aules
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateClassroom>,
) -> AppResult<(StatusCode, Json<DataResponse<Classroom>>)> {
    validate_non_empty("name", &input.name)?;
    let classroom = ClassroomRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: classroom })))
}

/// GET /api/aules
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Classroom>>>> {
    let classrooms = ClassroomRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: classrooms }))
}

/// GET /api/aules/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Classroom>>> {
    let classroom = ClassroomRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| classroom_not_found(id))?;
    Ok(Json(DataResponse { data: classroom }))
}

/// PUT /api/aules/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClassroom>,
) -> AppResult<Json<DataResponse<Classroom>>> {
    if let Some(name) = &input.name {
        validate_non_empty("name", name)?;
    }
    let classroom = ClassroomRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| classroom_not_found(id))?;
    Ok(Json(DataResponse { data: classroom }))
}

/// DELETE /api/aules/{id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClassroomRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(classroom_not_found(id))
    }
}
