//! Handlers for the `/horaris` resource (weekly timetable rows).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::schedule::validate_weekday;
use guardies_core::types::DbId;
use guardies_core::validation::{validate_non_empty, validate_time_range};
use guardies_db::models::schedule::{CreateSchedule, Schedule, UpdateSchedule};
use guardies_db::repositories::ScheduleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::ScheduleListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn schedule_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Schedule",
        id,
    })
}

/// POST /api/horaris
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateSchedule>,
) -> AppResult<(StatusCode, Json<DataResponse<Schedule>>)> {
    validate_weekday(input.weekday)?;
    validate_time_range(input.start_time, input.end_time)?;
    validate_non_empty("subject_code", &input.subject_code)?;

    let schedule = ScheduleRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: schedule })))
}

/// GET /api/horaris?professor_id=&weekday=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ScheduleListParams>,
) -> AppResult<Json<DataResponse<Vec<Schedule>>>> {
    if let Some(weekday) = params.weekday {
        validate_weekday(weekday)?;
    }
    let schedules = ScheduleRepo::list(&state.pool, params.professor_id, params.weekday).await?;
    Ok(Json(DataResponse { data: schedules }))
}

/// GET /api/horaris/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Schedule>>> {
    let schedule = ScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| schedule_not_found(id))?;
    Ok(Json(DataResponse { data: schedule }))
}

/// PUT /api/horaris/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSchedule>,
) -> AppResult<Json<DataResponse<Schedule>>> {
    let existing = ScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| schedule_not_found(id))?;

    if let Some(weekday) = input.weekday {
        validate_weekday(weekday)?;
    }
    if let Some(code) = &input.subject_code {
        validate_non_empty("subject_code", code)?;
    }
    validate_time_range(
        input.start_time.unwrap_or(existing.start_time),
        input.end_time.unwrap_or(existing.end_time),
    )?;

    let schedule = ScheduleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| schedule_not_found(id))?;
    Ok(Json(DataResponse { data: schedule }))
}

/// DELETE /api/horaris/{id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ScheduleRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(schedule_not_found(id))
    }
}
