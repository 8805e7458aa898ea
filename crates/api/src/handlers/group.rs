//! Handlers for the `/grups` resource (class groups).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::types::DbId;
use guardies_core::validation::validate_non_empty;
use guardies_db::models::group::{CreateGroup, Group, UpdateGroup};
use guardies_db::repositories::GroupRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn group_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Group", id })
}

/// POST /api/grups
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateGroup>,
) -> AppResult<(StatusCode, Json<DataResponse<Group>>)> {
    validate_non_empty("name", &input.name)?;
    let group = GroupRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// GET /api/grups
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Group>>>> {
    let groups = GroupRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/grups/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Group>>> {
    let group = GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    Ok(Json(DataResponse { data: group }))
}

/// PUT /api/grups/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGroup>,
) -> AppResult<Json<DataResponse<Group>>> {
    if let Some(name) = &input.name {
        validate_non_empty("name", name)?;
    }
    let group = GroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    Ok(Json(DataResponse { data: group }))
}

/// DELETE /api/grups/{id}
///
/// Students and outings of the group keep existing without a group.
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if GroupRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(group_not_found(id))
    }
}
