//! Handlers for the `/cursos-academics` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::types::DbId;
use guardies_core::validation::{validate_date_range, validate_non_empty};
use guardies_db::models::academic_year::{AcademicYear, CreateAcademicYear, UpdateAcademicYear};
use guardies_db::repositories::AcademicYearRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn year_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "AcademicYear",
        id,
    })
}

/// POST /api/cursos-academics
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateAcademicYear>,
) -> AppResult<(StatusCode, Json<DataResponse<AcademicYear>>)> {
    validate_non_empty("name", &input.name)?;
    validate_date_range(input.start_date, input.end_date)?;
    let year = AcademicYearRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: year })))
}

/// GET /api/cursos-academics
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AcademicYear>>>> {
    let years = AcademicYearRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: years }))
}

/// GET /api/cursos-academics/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AcademicYear>>> {
    let year = AcademicYearRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| year_not_found(id))?;
    Ok(Json(DataResponse { data: year }))
}

/// PUT /api/cursos-academics/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAcademicYear>,
) -> AppResult<Json<DataResponse<AcademicYear>>> {
    let existing = AcademicYearRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| year_not_found(id))?;
    if let Some(name) = &input.name {
        validate_non_empty("name", name)?;
    }
    validate_date_range(
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
    )?;

    let year = AcademicYearRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| year_not_found(id))?;
    Ok(Json(DataResponse { data: year }))
}

/// DELETE /api/cursos-academics/{id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AcademicYearRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(year_not_found(id))
    }
}
