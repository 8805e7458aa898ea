//! Handlers for the `/tasques` resource.

use std::path::PathBuf;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::roles::is_manager_role;
use guardies_core::task::validate_task_transition;
use guardies_core::types::DbId;
use guardies_core::validation::validate_non_empty;
use guardies_db::models::task::{CreateTask, Task, UpdateTask};
use guardies_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::TaskListParams;
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// Directory holding the attachments of task `task_id`.
pub(crate) fn task_dir(state: &AppState, task_id: DbId) -> PathBuf {
    state.config.attachments_dir.join(format!("task_{task_id}"))
}

/// POST /api/tasques
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    validate_non_empty("title", &input.title)?;
    let task = TaskRepo::create(&state.pool, &input, Some(user.professor_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/tasques?professor_id=&status=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let tasks = TaskRepo::list(&state.pool, params.professor_id, params.status).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/tasques/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/tasques/{id}
///
/// A `status_id` change must follow the task lifecycle (409 otherwise).
pub async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    let existing = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    if let Some(title) = &input.title {
        validate_non_empty("title", title)?;
    }
    if let Some(to) = input.status_id {
        validate_task_transition(existing.status_id, to)?;
    }

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/tasques/{id}
///
/// Only the creator or a manager may delete. Stored attachment files are
/// removed too.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    if task.created_by != Some(user.professor_id) && !is_manager_role(&user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the creator or a manager can delete this task".into(),
        )));
    }

    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(task_not_found(id));
    }

    let dir = task_dir(&state, id);
    match tokio::fs::remove_dir_all(&dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(task_id = id, path = %dir.display(), error = %e, "Failed to remove attachment directory");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
