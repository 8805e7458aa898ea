//! Substitute ranking and automatic guard assignment.
//!
//! Candidates are bucketed into tiers by what their timetable says they are
//! doing during the slot:
//!
//! | tier | status                     |
//! |------|----------------------------|
//! | 1    | guard-duty hour (`G`)      |
//! | 2    | teaching, can be pulled    |
//! | 3    | nothing scheduled          |
//!
//! Within a tier the professor with fewer guard duties so far goes first.
//! Professor id breaks the remaining ties so the order is deterministic.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::guard::AssignmentReason;
use crate::schedule::{professor_status_at, ScheduleEntry, Slot, SlotStatus, TimeRange};
use crate::types::DbId;

/// A professor that is already committed elsewhere (another guard duty, an
/// outing) during part of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInterval {
    pub professor_id: DbId,
    pub date: NaiveDate,
    pub range: TimeRange,
}

/// Everything the ranking needs to know about the staff.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    /// Active (not deleted) professors.
    pub professor_ids: Vec<DbId>,
    pub schedule: Vec<ScheduleEntry>,
    /// Guard duties assigned so far, per professor. Missing means zero.
    pub guard_counts: HashMap<DbId, i64>,
    pub busy: Vec<BusyInterval>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidate {
    pub professor_id: DbId,
    pub tier: u8,
    pub status: SlotStatus,
    pub guard_count: i64,
}

/// Tier number for a timetable status (1 is preferred).
pub fn tier_of(status: SlotStatus) -> u8 {
    match status {
        SlotStatus::OnGuard => 1,
        SlotStatus::Teaching => 2,
        SlotStatus::Free => 3,
    }
}

fn is_busy(busy: &[BusyInterval], professor_id: DbId, date: NaiveDate, range: &TimeRange) -> bool {
    busy.iter()
        .any(|b| b.professor_id == professor_id && b.date == date && b.range.overlaps(range))
}

fn rank_with(
    date: NaiveDate,
    range: TimeRange,
    exclude: &HashSet<DbId>,
    professor_ids: &[DbId],
    schedule: &[ScheduleEntry],
    guard_counts: &HashMap<DbId, i64>,
    busy: &[BusyInterval],
) -> Vec<RankedCandidate> {
    let slot = Slot::on_date(date, range);
    let mut seen = HashSet::new();

    let mut ranked: Vec<RankedCandidate> = professor_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .filter(|id| !exclude.contains(id))
        .filter(|id| !is_busy(busy, *id, date, &range))
        .map(|professor_id| {
            let status = professor_status_at(schedule, professor_id, &slot);
            RankedCandidate {
                professor_id,
                tier: tier_of(status),
                status,
                guard_count: guard_counts.get(&professor_id).copied().unwrap_or(0),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then(a.guard_count.cmp(&b.guard_count))
            .then(a.professor_id.cmp(&b.professor_id))
    });
    ranked
}

/// Rank the professors who could cover `range` on `date`.
///
/// Excluded and busy professors never appear in the result. Returns an empty
/// list when nobody is eligible.
pub fn rank_candidates(
    date: NaiveDate,
    range: TimeRange,
    exclude: &HashSet<DbId>,
    pool: &CandidatePool,
) -> Vec<RankedCandidate> {
    rank_with(
        date,
        range,
        exclude,
        &pool.professor_ids,
        &pool.schedule,
        &pool.guard_counts,
        &pool.busy,
    )
}

// ---------------------------------------------------------------------------
// Auto-assignment
// ---------------------------------------------------------------------------

/// A guard duty waiting for a professor.
#[derive(Debug, Clone)]
pub struct GuardRequest {
    pub guard_id: DbId,
    pub date: NaiveDate,
    pub range: TimeRange,
    /// Professors that must not cover this guard (e.g. the absent professor).
    pub exclude: HashSet<DbId>,
    pub reason: AssignmentReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAssignment {
    pub guard_id: DbId,
    pub professor_id: DbId,
    pub tier: u8,
    pub reason: AssignmentReason,
    pub priority: i16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoAssignPlan {
    pub assigned: Vec<PlannedAssignment>,
    /// Guards for which no professor was eligible.
    pub unassigned: Vec<DbId>,
}

/// Pick the best candidate for each request in a single pass.
///
/// Requests are handled in chronological order. Every pick bumps the
/// professor's guard count and marks them busy for that interval, so one
/// batch spreads the load and never double-books anyone.
pub fn plan_auto_assignments(requests: &[GuardRequest], pool: &CandidatePool) -> AutoAssignPlan {
    let mut ordered: Vec<&GuardRequest> = requests.iter().collect();
    ordered.sort_by_key(|r| (r.date, r.range.start, r.guard_id));

    let mut counts = pool.guard_counts.clone();
    let mut busy = pool.busy.clone();
    let mut plan = AutoAssignPlan::default();

    for request in ordered {
        let ranked = rank_with(
            request.date,
            request.range,
            &request.exclude,
            &pool.professor_ids,
            &pool.schedule,
            &counts,
            &busy,
        );

        match ranked.first() {
            Some(best) => {
                *counts.entry(best.professor_id).or_insert(0) += 1;
                busy.push(BusyInterval {
                    professor_id: best.professor_id,
                    date: request.date,
                    range: request.range,
                });
                plan.assigned.push(PlannedAssignment {
                    guard_id: request.guard_id,
                    professor_id: best.professor_id,
                    tier: best.tier,
                    reason: request.reason,
                    priority: request.reason.default_priority(),
                });
            }
            None => plan.unassigned.push(request.guard_id),
        }
    }

    plan
}
