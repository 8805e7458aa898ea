//! Candidate pool loading and per-guard ranking.

use std::collections::{BTreeSet, HashSet};

use chrono::{Duration, NaiveDate, NaiveTime};
use guardies_core::guard::{AssignmentReason, GUARD_TYPE_SUBSTITUTION};
use guardies_core::ranking::{rank_candidates, BusyInterval, CandidatePool, GuardRequest, RankedCandidate};
use guardies_core::schedule::TimeRange;
use guardies_core::types::DbId;
use guardies_db::models::guard::Guard;
use guardies_db::models::outing::OutingAbsence;
use guardies_db::repositories::{AssignmentRepo, OutingRepo, ProfessorRepo, ScheduleRepo};
use sqlx::PgPool;

/// Range used for outings without hours: the whole day.
fn whole_day() -> TimeRange {
    TimeRange {
        start: NaiveTime::MIN,
        end: NaiveTime::MIN + Duration::seconds(86_399),
    }
}

/// Hours an outing keeps its professor away; the whole day when unset.
fn absence_range(absence: &OutingAbsence) -> TimeRange {
    match (absence.start_time, absence.end_time) {
        (Some(start), Some(end)) => TimeRange { start, end },
        _ => whole_day(),
    }
}

/// Existing commitments on `date`: guards already covered and outings.
pub async fn busy_intervals(pool: &PgPool, date: NaiveDate) -> Result<Vec<BusyInterval>, sqlx::Error> {
    let mut busy = AssignmentRepo::busy_on(pool, date).await?;
    for absence in OutingRepo::absences_on(pool, date).await? {
        busy.push(BusyInterval {
            professor_id: absence.professor_id,
            date,
            range: absence_range(&absence),
        });
    }
    Ok(busy)
}

/// Whether `professor_id` already has a guard or an outing overlapping
/// `range` on `date`. `except_guard` is left out, so a guard being moved
/// does not clash with itself.
pub async fn is_busy(
    pool: &PgPool,
    professor_id: DbId,
    date: NaiveDate,
    range: &TimeRange,
    except_guard: Option<DbId>,
) -> Result<bool, sqlx::Error> {
    if AssignmentRepo::covers_overlapping(pool, professor_id, date, range, except_guard).await? {
        return Ok(true);
    }
    Ok(OutingRepo::absences_on(pool, date)
        .await?
        .iter()
        .any(|a| a.professor_id == professor_id && absence_range(a).overlaps(range)))
}

/// Load everything the ranking needs for guards falling on `dates`.
pub async fn load_candidate_pool(
    pool: &PgPool,
    dates: &BTreeSet<NaiveDate>,
) -> Result<CandidatePool, sqlx::Error> {
    let professor_ids = ProfessorRepo::list_active_ids(pool).await?;
    let schedule = ScheduleRepo::list_all(pool)
        .await?
        .iter()
        .map(|s| s.entry())
        .collect();
    let guard_counts = AssignmentRepo::guard_counts(pool).await?;

    let mut busy = Vec::new();
    for &date in dates {
        busy.extend(busy_intervals(pool, date).await?);
    }

    Ok(CandidatePool {
        professor_ids,
        schedule,
        guard_counts,
        busy,
    })
}

/// Reason recorded when the engine picks the professor for `guard`.
pub fn reason_for(guard: &Guard) -> AssignmentReason {
    if guard.outing_id.is_some() || guard.guard_type == GUARD_TYPE_SUBSTITUTION {
        AssignmentReason::Sortida
    } else {
        AssignmentReason::Equilibri
    }
}

/// Ranking input for one guard. The professor whose class is being covered
/// never covers it.
pub fn guard_request(guard: &Guard) -> GuardRequest {
    GuardRequest {
        guard_id: guard.id,
        date: guard.date,
        range: guard.range(),
        exclude: guard.absent_professor_id.into_iter().collect(),
        reason: reason_for(guard),
    }
}

/// Ranked candidates for an existing guard.
///
/// `also_exclude` holds extra professors to leave out (e.g. the one
/// currently assigned).
pub async fn rank_for_guard(
    pool: &PgPool,
    guard: &Guard,
    also_exclude: &[DbId],
) -> Result<Vec<RankedCandidate>, sqlx::Error> {
    let candidates = load_candidate_pool(pool, &BTreeSet::from([guard.date])).await?;
    let mut exclude: HashSet<DbId> = guard.absent_professor_id.into_iter().collect();
    exclude.extend(also_exclude.iter().copied());
    Ok(rank_candidates(guard.date, guard.range(), &exclude, &candidates))
}
