//! Handlers for the `/sortides` resource: outings, the classes they leave
//! uncovered and the substitutions proposed for them.

use std::collections::{BTreeSet, HashMap, HashSet};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use guardies_core::error::CoreError;
use guardies_core::outing::{classes_to_cover, ClassToCover};
use guardies_core::ranking::{rank_candidates, RankedCandidate};
use guardies_core::schedule::TimeRange;
use guardies_core::types::DbId;
use guardies_core::validation::validate_non_empty;
use guardies_db::models::outing::{build_window, CreateOuting, OutingWithProfessors, UpdateOuting};
use guardies_db::models::schedule::Schedule;
use guardies_db::models::substitution::{ConfirmOutcome, Substitution, SubstitutionProposal};
use guardies_db::repositories::{OutingRepo, ScheduleRepo, SubstitutionRepo};
use serde::Serialize;

use crate::engine::candidates::{is_busy, load_candidate_pool};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// One class left without its professor, with who could take it.
#[derive(Debug, Serialize)]
pub struct ClassToCoverView {
    #[serde(flatten)]
    pub class: ClassToCover,
    pub group_name: Option<String>,
    pub room: Option<String>,
    /// Best substitutes first.
    pub candidates: Vec<RankedCandidate>,
    /// Current proposal for this class, if any.
    pub substitution: Option<Substitution>,
}

fn outing_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Outing", id })
}

async fn find_outing(state: &AppState, id: DbId) -> AppResult<OutingWithProfessors> {
    OutingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| outing_not_found(id))
}

/// Classes of the outing's professors that fall inside it, plus the
/// timetable rows they come from.
async fn uncovered_classes(
    state: &AppState,
    outing: &OutingWithProfessors,
) -> AppResult<(Vec<ClassToCover>, HashMap<DbId, Schedule>)> {
    let window = outing.outing.window()?;
    let absent: HashSet<DbId> = outing.professor_ids.iter().copied().collect();
    let schedules = ScheduleRepo::list_all(&state.pool).await?;
    let entries: Vec<_> = schedules.iter().map(|s| s.entry()).collect();

    let classes = classes_to_cover(&window, &absent, &entries);
    let by_id = schedules.into_iter().map(|s| (s.id, s)).collect();
    Ok((classes, by_id))
}

/// POST /api/sortides
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateOuting>,
) -> AppResult<(StatusCode, Json<DataResponse<OutingWithProfessors>>)> {
    validate_non_empty("name", &input.name)?;
    build_window(input.start_date, input.end_date, input.start_time, input.end_time)?;

    let outing = OutingRepo::create(&state.pool, &input).await?;
    tracing::info!(
        outing_id = outing.outing.id,
        professors = outing.professor_ids.len(),
        "Outing created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: outing })))
}

/// GET /api/sortides
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<OutingWithProfessors>>>> {
    let outings = OutingRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: outings }))
}

/// GET /api/sortides/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OutingWithProfessors>>> {
    let outing = find_outing(&state, id).await?;
    Ok(Json(DataResponse { data: outing }))
}

/// PUT /api/sortides/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOuting>,
) -> AppResult<Json<DataResponse<OutingWithProfessors>>> {
    let existing = find_outing(&state, id).await?.outing;

    if let Some(name) = &input.name {
        validate_non_empty("name", name)?;
    }
    build_window(
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
        input.start_time.or(existing.start_time),
        input.end_time.or(existing.end_time),
    )?;

    let outing = OutingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| outing_not_found(id))?;
    Ok(Json(DataResponse { data: outing }))
}

/// DELETE /api/sortides/{id}
///
/// Guards generated from the outing's confirmed substitutions go with it.
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if OutingRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(outing_not_found(id))
    }
}

/// GET /api/sortides/{id}/classes-substituir
///
/// Every class the outing leaves uncovered, with ranked substitutes. The
/// outing's own professors are never proposed.
pub async fn classes_to_substitute(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ClassToCoverView>>>> {
    let outing = find_outing(&state, id).await?;
    let (classes, schedules) = uncovered_classes(&state, &outing).await?;

    let dates: BTreeSet<NaiveDate> = classes.iter().map(|c| c.date).collect();
    let candidates = load_candidate_pool(&state.pool, &dates).await?;
    let absent: HashSet<DbId> = outing.professor_ids.iter().copied().collect();

    let mut proposals: HashMap<(DbId, NaiveDate), Substitution> =
        SubstitutionRepo::list_by_outing(&state.pool, id)
            .await?
            .into_iter()
            .map(|s| ((s.schedule_id, s.date), s))
            .collect();

    let views = classes
        .into_iter()
        .map(|class| {
            let schedule = schedules.get(&class.schedule_id);
            ClassToCoverView {
                group_name: schedule.and_then(|s| s.group_name.clone()),
                room: schedule.and_then(|s| s.room.clone()),
                candidates: rank_candidates(class.date, class.range, &absent, &candidates),
                substitution: proposals.remove(&(class.schedule_id, class.date)),
                class,
            }
        })
        .collect();

    Ok(Json(DataResponse { data: views }))
}

/// GET /api/sortides/{id}/substitucions
pub async fn list_substitutions(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Substitution>>>> {
    find_outing(&state, id).await?;
    let substitutions = SubstitutionRepo::list_by_outing(&state.pool, id).await?;
    Ok(Json(DataResponse { data: substitutions }))
}

/// POST /api/sortides/{id}/substitucions
///
/// Save proposals (a JSON array) for classes of the outing. Each proposal
/// must name a class the outing actually leaves uncovered. Proposals for
/// classes already confirmed are ignored.
///
/// A substitute who is already busy at that time, or who would end up
/// proposed for two overlapping classes of the outing, is refused with 409.
pub async fn propose_substitutions(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(proposals): Json<Vec<SubstitutionProposal>>,
) -> AppResult<Json<DataResponse<Vec<Substitution>>>> {
    let outing = find_outing(&state, id).await?;
    let (classes, _) = uncovered_classes(&state, &outing).await?;
    let class_ranges: HashMap<(DbId, NaiveDate), TimeRange> = classes
        .iter()
        .map(|c| ((c.schedule_id, c.date), c.range))
        .collect();

    let existing = SubstitutionRepo::list_by_outing(&state.pool, id).await?;
    let confirmed: HashSet<(DbId, NaiveDate)> = existing
        .iter()
        .filter(|s| s.confirmed_at.is_some())
        .map(|s| (s.schedule_id, s.date))
        .collect();
    let incoming: HashSet<(DbId, NaiveDate)> =
        proposals.iter().map(|p| (p.schedule_id, p.date)).collect();

    // Pending covers that will still stand once this batch is saved.
    let mut held: Vec<((DbId, NaiveDate), DbId, TimeRange)> = existing
        .iter()
        .filter(|s| s.confirmed_at.is_none() && !incoming.contains(&(s.schedule_id, s.date)))
        .filter_map(|s| {
            let slot = (s.schedule_id, s.date);
            Some((slot, s.substitute_professor_id?, *class_ranges.get(&slot)?))
        })
        .collect();

    for proposal in &proposals {
        let slot = (proposal.schedule_id, proposal.date);
        let Some(range) = class_ranges.get(&slot).copied() else {
            return Err(AppError::Core(CoreError::validation(format!(
                "Schedule {} on {} is not a class left uncovered by this outing",
                proposal.schedule_id, proposal.date
            ))));
        };
        let Some(substitute) = proposal.substitute_professor_id else {
            continue;
        };
        if outing.professor_ids.contains(&substitute) {
            return Err(AppError::Core(CoreError::validation(format!(
                "Professor {substitute} is on the outing and cannot substitute"
            ))));
        }
        if confirmed.contains(&slot) {
            continue;
        }

        let double_booked = held.iter().any(|(other, professor, other_range)| {
            *other != slot
                && *professor == substitute
                && other.1 == proposal.date
                && other_range.overlaps(&range)
        });
        if double_booked {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Professor {substitute} is proposed for two overlapping classes on {}",
                proposal.date
            ))));
        }
        if is_busy(&state.pool, substitute, proposal.date, &range, None).await? {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Professor {substitute} is already busy on {} from {} to {}",
                proposal.date, range.start, range.end
            ))));
        }
        held.push((slot, substitute, range));
    }

    let mut skipped = 0usize;
    for proposal in &proposals {
        if SubstitutionRepo::upsert_proposal(&state.pool, id, proposal)
            .await?
            .is_none()
        {
            skipped += 1;
        }
    }
    tracing::debug!(outing_id = id, saved = proposals.len() - skipped, skipped, "Substitutions proposed");

    let substitutions = SubstitutionRepo::list_by_outing(&state.pool, id).await?;
    Ok(Json(DataResponse { data: substitutions }))
}

/// POST /api/sortides/{id}/confirmar-substitucions
///
/// Turn each pending proposal with a substitute into an assigned
/// `substitucio` guard. Returns the substitutions confirmed by this call.
pub async fn confirm_substitutions(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Substitution>>>> {
    find_outing(&state, id).await?;
    match SubstitutionRepo::confirm_all(&state.pool, id).await? {
        ConfirmOutcome::Confirmed(confirmed) => {
            tracing::info!(outing_id = id, confirmed = confirmed.len(), "Substitutions confirmed");
            Ok(Json(DataResponse { data: confirmed }))
        }
        ConfirmOutcome::SubstituteBusy {
            substitution_id,
            professor_id,
            date,
        } => {
            tracing::warn!(outing_id = id, substitution_id, professor_id, %date, "Substitute busy, nothing confirmed");
            Err(AppError::Core(CoreError::Conflict(format!(
                "Professor {professor_id} is already busy on {date}; substitution {substitution_id} needs another substitute"
            ))))
        }
    }
}
