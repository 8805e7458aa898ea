//! Handlers for the `/guardies` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::guard::{state_machine, validate_guard_type, GUARD_STATUS_ASSIGNED, GUARD_STATUS_COMPLETED};
use guardies_core::types::DbId;
use guardies_core::validation::validate_time_range;
use guardies_db::models::guard::{CreateGuard, Guard, UpdateGuard};
use guardies_db::models::status::AssignmentStatus;
use guardies_db::repositories::{AssignmentRepo, GuardRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::assignment::check_professor_can_cover;
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::GuardListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn guard_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Guard", id })
}

/// POST /api/guardies
///
/// New guards are always pending; assign them through
/// `/assignacions-guardia`.
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateGuard>,
) -> AppResult<(StatusCode, Json<DataResponse<Guard>>)> {
    validate_guard_type(&input.guard_type)?;
    validate_time_range(input.start_time, input.end_time)?;

    let guard = GuardRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: guard })))
}

/// GET /api/guardies?from=&to=&status=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<GuardListParams>,
) -> AppResult<Json<DataResponse<Vec<Guard>>>> {
    params.validate()?;
    let guards = GuardRepo::list(&state.pool, params.from, params.to, params.status).await?;
    Ok(Json(DataResponse { data: guards }))
}

/// GET /api/guardies/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Guard>>> {
    let guard = GuardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| guard_not_found(id))?;
    Ok(Json(DataResponse { data: guard }))
}

/// PUT /api/guardies/{id}
///
/// Descriptive fields are updated in place. A `status_id` change is checked
/// against the guard state machine: only completing an assigned guard is
/// done here, assigning happens by creating an assignment.
///
/// Moving an assigned guard (date, hours or absent professor) re-checks
/// that its professor can still cover it.
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGuard>,
) -> AppResult<Json<DataResponse<Guard>>> {
    let existing = GuardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| guard_not_found(id))?;

    if let Some(guard_type) = &input.guard_type {
        validate_guard_type(guard_type)?;
    }
    validate_time_range(
        input.start_time.unwrap_or(existing.start_time),
        input.end_time.unwrap_or(existing.end_time),
    )?;

    let target_status = input.status_id.filter(|s| *s != existing.status_id);
    if let Some(to) = target_status {
        state_machine::validate_transition(existing.status_id, to)
            .map_err(|msg| AppError::Core(CoreError::Conflict(msg)))?;
        if to == GUARD_STATUS_ASSIGNED {
            return Err(AppError::BadRequest(
                "Assign a professor through /assignacions-guardia instead".into(),
            ));
        }
    }

    let moved = Guard {
        date: input.date.unwrap_or(existing.date),
        start_time: input.start_time.unwrap_or(existing.start_time),
        end_time: input.end_time.unwrap_or(existing.end_time),
        absent_professor_id: input.absent_professor_id.or(existing.absent_professor_id),
        ..existing.clone()
    };
    let slot_changed = moved.date != existing.date
        || moved.start_time != existing.start_time
        || moved.end_time != existing.end_time
        || moved.absent_professor_id != existing.absent_professor_id;
    if slot_changed && existing.status_id == GUARD_STATUS_ASSIGNED {
        let assignment = AssignmentRepo::find_by_guard(&state.pool, id).await?;
        if let Some(assignment) = assignment.filter(|a| a.status_id == AssignmentStatus::Active.id()) {
            check_professor_can_cover(&state, &moved, assignment.professor_id).await?;
        }
    }

    let guard = if target_status == Some(GUARD_STATUS_COMPLETED) {
        let guard = GuardRepo::update_and_complete(&state.pool, id, &input)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(format!(
                    "Guard {id} is no longer assigned"
                )))
            })?;
        tracing::info!(guard_id = id, "Guard completed");
        guard
    } else {
        GuardRepo::update(&state.pool, id, &input)
            .await?
            .ok_or_else(|| guard_not_found(id))?
    };

    Ok(Json(DataResponse { data: guard }))
}

/// DELETE /api/guardies/{id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if GuardRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(guard_not_found(id))
    }
}
