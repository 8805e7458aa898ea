//! Handlers for the `/assignacions-guardia` resource.
//!
//! Assignments are never deleted. A wrong pick is fixed by reassigning
//! (`PUT`), and completing the guard completes its assignment.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use guardies_core::error::CoreError;
use guardies_core::guard::{validate_priority, AssignmentReason, GUARD_STATUS_PENDING};
use guardies_core::types::DbId;
use guardies_db::models::assignment::{CreateAssignment, GuardAssignment, ReassignAssignment};
use guardies_db::models::guard::Guard;
use guardies_db::repositories::{AssignmentRepo, GuardRepo, ProfessorRepo};
use serde::{Deserialize, Serialize};

use crate::engine::candidates::{is_busy, reason_for};
use crate::engine::dispatcher::auto_assign as run_auto_assign;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::AssignmentListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /assignacions-guardia`.
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub guardia_id: DbId,
    pub professor_id: DbId,
    /// Defaults to the reason's default priority.
    pub priority: Option<i16>,
    /// Defaults to `sortida` for outing covers, `equilibri` otherwise.
    pub reason: Option<String>,
}

/// Body of `POST /assignacions-guardia/auto-assign`.
///
/// With `guardia_id` only that guard is assigned; with `date` every pending
/// guard on that day; with neither every pending guard.
#[derive(Debug, Default, Deserialize)]
pub struct AutoAssignRequest {
    pub guardia_id: Option<DbId>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AutoAssignResponse {
    pub assigned: Vec<GuardAssignment>,
    /// Guards left pending because nobody was eligible.
    pub unassigned: Vec<DbId>,
}

fn parse_reason(code: &str) -> Result<AssignmentReason, CoreError> {
    AssignmentReason::from_code(code)
        .ok_or_else(|| CoreError::validation(format!("Unknown assignment reason '{code}'")))
}

fn assignment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "GuardAssignment",
        id,
    })
}

async fn find_guard(state: &AppState, id: DbId) -> AppResult<Guard> {
    GuardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Guard", id }))
}

/// Reject professors that do not exist, are the one being covered, or are
/// already busy during the guard. The guard itself never counts as a clash.
pub(crate) async fn check_professor_can_cover(
    state: &AppState,
    guard: &Guard,
    professor_id: DbId,
) -> AppResult<()> {
    ProfessorRepo::find_by_id(&state.pool, professor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Professor",
            id: professor_id,
        }))?;

    if guard.absent_professor_id == Some(professor_id) {
        return Err(AppError::Core(CoreError::validation(
            "A professor cannot cover their own class",
        )));
    }

    if is_busy(&state.pool, professor_id, guard.date, &guard.range(), Some(guard.id)).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Professor {professor_id} is already busy at that time"
        ))));
    }
    Ok(())
}

/// POST /api/assignacions-guardia
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateAssignmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GuardAssignment>>)> {
    let guard = find_guard(&state, input.guardia_id).await?;

    let reason = match &input.reason {
        Some(code) => parse_reason(code)?,
        None => reason_for(&guard),
    };
    let priority = input.priority.unwrap_or_else(|| reason.default_priority());
    validate_priority(priority)?;

    if guard.status_id != GUARD_STATUS_PENDING {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Guard {} is not pending",
            guard.id
        ))));
    }
    check_professor_can_cover(&state, &guard, input.professor_id).await?;

    let assignment = AssignmentRepo::create(
        &state.pool,
        &CreateAssignment {
            guard_id: guard.id,
            professor_id: input.professor_id,
            priority,
            reason: reason.code().to_string(),
        },
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "Guard {} is not pending",
            guard.id
        )))
    })?;

    tracing::info!(
        guard_id = guard.id,
        professor_id = input.professor_id,
        reason = %reason,
        "Guard assigned"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// GET /api/assignacions-guardia?guardia_id=&professor_id=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<AssignmentListParams>,
) -> AppResult<Json<DataResponse<Vec<GuardAssignment>>>> {
    let assignments =
        AssignmentRepo::list(&state.pool, params.guardia_id, params.professor_id).await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// GET /api/assignacions-guardia/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GuardAssignment>>> {
    let assignment = AssignmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| assignment_not_found(id))?;
    Ok(Json(DataResponse { data: assignment }))
}

/// PUT /api/assignacions-guardia/{id}
///
/// Reassign an active assignment. Completed ones are frozen (409).
pub async fn reassign(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReassignAssignment>,
) -> AppResult<Json<DataResponse<GuardAssignment>>> {
    let existing = AssignmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| assignment_not_found(id))?;

    if let Some(code) = &input.reason {
        parse_reason(code)?;
    }
    if let Some(priority) = input.priority {
        validate_priority(priority)?;
    }
    if let Some(professor_id) = input.professor_id.filter(|p| *p != existing.professor_id) {
        let guard = find_guard(&state, existing.guard_id).await?;
        check_professor_can_cover(&state, &guard, professor_id).await?;
    }

    let assignment = AssignmentRepo::reassign(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Assignment {id} is completed and cannot be changed"
            )))
        })?;

    tracing::info!(
        assignment_id = id,
        from = existing.professor_id,
        to = assignment.professor_id,
        "Guard reassigned"
    );
    Ok(Json(DataResponse { data: assignment }))
}

/// POST /api/assignacions-guardia/auto-assign
///
/// Pick the best candidate for each pending guard in scope, spreading the
/// load across the staff.
pub async fn auto_assign(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<AutoAssignRequest>,
) -> AppResult<Json<DataResponse<AutoAssignResponse>>> {
    let guards = match input.guardia_id {
        Some(id) => {
            let guard = find_guard(&state, id).await?;
            if guard.status_id != GUARD_STATUS_PENDING {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Guard {id} is not pending"
                ))));
            }
            vec![guard]
        }
        None => GuardRepo::list_pending(&state.pool, input.date).await?,
    };

    let outcome = run_auto_assign(&state.pool, &guards).await?;
    Ok(Json(DataResponse {
        data: AutoAssignResponse {
            assigned: outcome.created,
            unassigned: outcome.plan.unassigned,
        },
    }))
}
