//! Handlers for the `/comunicacions` resource.
//!
//! Any professor may post. Only the author or a manager may edit or delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::communication::validate_kind;
use guardies_core::error::CoreError;
use guardies_core::roles::is_manager_role;
use guardies_core::types::DbId;
use guardies_core::validation::validate_non_empty;
use guardies_db::models::communication::{Communication, CreateCommunication, UpdateCommunication};
use guardies_db::repositories::CommunicationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::GroupFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn communication_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Communication",
        id,
    })
}

async fn find_editable(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Communication> {
    let communication = CommunicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| communication_not_found(id))?;
    if communication.author_professor_id != Some(user.professor_id) && !is_manager_role(&user.role)
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or a manager can change this communication".into(),
        )));
    }
    Ok(communication)
}

/// POST /api/comunicacions
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateCommunication>,
) -> AppResult<(StatusCode, Json<DataResponse<Communication>>)> {
    validate_non_empty("title", &input.title)?;
    if input.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::validation("body must not be empty")));
    }
    if let Some(kind) = &input.kind {
        validate_kind(kind)?;
    }

    let communication =
        CommunicationRepo::create(&state.pool, &input, Some(user.professor_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: communication })))
}

/// GET /api/comunicacions?group_id=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<GroupFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Communication>>>> {
    let communications = CommunicationRepo::list(&state.pool, params.group_id).await?;
    Ok(Json(DataResponse {
        data: communications,
    }))
}

/// GET /api/comunicacions/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Communication>>> {
    let communication = CommunicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| communication_not_found(id))?;
    Ok(Json(DataResponse {
        data: communication,
    }))
}

/// PUT /api/comunicacions/{id}
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCommunication>,
) -> AppResult<Json<DataResponse<Communication>>> {
    find_editable(&state, &user, id).await?;

    if let Some(title) = &input.title {
        validate_non_empty("title", title)?;
    }
    if let Some(kind) = &input.kind {
        validate_kind(kind)?;
    }

    let communication = CommunicationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| communication_not_found(id))?;
    Ok(Json(DataResponse {
        data: communication,
    }))
}

/// DELETE /api/comunicacions/{id}
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_editable(&state, &user, id).await?;
    if CommunicationRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(communication_not_found(id))
    }
}
