//! Handlers for the `/professors` resource.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::ranking::RankedCandidate;
use guardies_core::roles::is_valid_role;
use guardies_core::types::DbId;
use guardies_core::validation::{validate_email, validate_non_empty};
use guardies_db::models::professor::{CreateProfessor, Professor, UpdateProfessor};
use guardies_db::repositories::{AssignmentRepo, GuardRepo, ProfessorRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::engine::candidates::rank_for_guard;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /professors`. Without a password the professor exists for
/// timetables and guards but cannot log in.
#[derive(Debug, Deserialize)]
pub struct CreateProfessorRequest {
    #[serde(flatten)]
    pub professor: CreateProfessor,
    pub password: Option<String>,
}

/// Body of `PUT /professors/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfessorRequest {
    #[serde(flatten)]
    pub professor: UpdateProfessor,
    pub password: Option<String>,
}

/// A ranked candidate with the professor's display name.
#[derive(Debug, Serialize)]
pub struct AvailableProfessor {
    #[serde(flatten)]
    pub candidate: RankedCandidate,
    pub name: String,
    pub surname: String,
}

fn validate_role(role: Option<&str>) -> Result<(), CoreError> {
    match role {
        Some(role) if !is_valid_role(role) => {
            Err(CoreError::validation(format!("Unknown role '{role}'")))
        }
        _ => Ok(()),
    }
}

fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password_strength(password)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// POST /api/professors
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateProfessorRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Professor>>)> {
    let mut professor = input.professor;
    validate_non_empty("name", &professor.name)?;
    validate_non_empty("surname", &professor.surname)?;
    validate_email(professor.email.trim())?;
    validate_role(professor.role.as_deref())?;

    if let Some(password) = &input.password {
        professor.password_hash = Some(hash_new_password(password)?);
    }

    let created = ProfessorRepo::create(&state.pool, &professor).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/professors
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Professor>>>> {
    let professors = ProfessorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: professors }))
}

/// GET /api/professors/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Professor>>> {
    let professor = ProfessorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Professor",
            id,
        }))?;
    Ok(Json(DataResponse { data: professor }))
}

/// PUT /api/professors/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProfessorRequest>,
) -> AppResult<Json<DataResponse<Professor>>> {
    let changes = &input.professor;
    if let Some(name) = &changes.name {
        validate_non_empty("name", name)?;
    }
    if let Some(surname) = &changes.surname {
        validate_non_empty("surname", surname)?;
    }
    if let Some(email) = &changes.email {
        validate_email(email.trim())?;
    }
    validate_role(changes.role.as_deref())?;

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Professor",
            id,
        })
    };

    let professor = ProfessorRepo::update(&state.pool, id, changes)
        .await?
        .ok_or_else(not_found)?;

    if let Some(password) = &input.password {
        let hash = hash_new_password(password)?;
        if !ProfessorRepo::set_password(&state.pool, id, &hash).await? {
            return Err(not_found());
        }
    }

    Ok(Json(DataResponse { data: professor }))
}

/// DELETE /api/professors/{id}
///
/// Soft delete: timetable and guard history stay, but the professor no
/// longer appears in lists or candidate rankings.
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProfessorRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Professor",
            id,
        }))
    }
}

/// GET /api/professors/available/{guardia_id}
///
/// Professors who could cover the guard, best first. The professor already
/// assigned to it is left out so the list can be used to reassign.
pub async fn available_for_guard(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(guard_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AvailableProfessor>>>> {
    let guard = GuardRepo::find_by_id(&state.pool, guard_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Guard",
            id: guard_id,
        }))?;

    let current: Vec<DbId> = AssignmentRepo::find_by_guard(&state.pool, guard_id)
        .await?
        .map(|a| a.professor_id)
        .into_iter()
        .collect();

    let ranked = rank_for_guard(&state.pool, &guard, &current).await?;
    let names: HashMap<DbId, Professor> = ProfessorRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let available = ranked
        .into_iter()
        .filter_map(|candidate| {
            let professor = names.get(&candidate.professor_id)?;
            Some(AvailableProfessor {
                name: professor.name.clone(),
                surname: professor.surname.clone(),
                candidate,
            })
        })
        .collect();

    Ok(Json(DataResponse { data: available }))
}
