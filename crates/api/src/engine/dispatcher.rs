//! Auto-assignment of pending guards.

use std::collections::BTreeSet;

use guardies_core::ranking::{plan_auto_assignments, AutoAssignPlan};
use guardies_db::models::assignment::{CreateAssignment, GuardAssignment};
use guardies_db::models::guard::Guard;
use guardies_db::repositories::AssignmentRepo;
use sqlx::PgPool;

use super::candidates::{guard_request, load_candidate_pool};

/// Outcome of one auto-assign run.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub plan: AutoAssignPlan,
    /// Rows actually written. May be shorter than `plan.assigned` if a guard
    /// stopped being pending while the plan was computed.
    pub created: Vec<GuardAssignment>,
}

/// Plan and apply assignments for `guards` in one pass.
///
/// Non-pending guards in the input are ignored by the write step.
pub async fn auto_assign(pool: &PgPool, guards: &[Guard]) -> Result<DispatchOutcome, sqlx::Error> {
    if guards.is_empty() {
        return Ok(DispatchOutcome {
            plan: AutoAssignPlan::default(),
            created: Vec::new(),
        });
    }

    let dates: BTreeSet<_> = guards.iter().map(|g| g.date).collect();
    let candidates = load_candidate_pool(pool, &dates).await?;
    let requests: Vec<_> = guards.iter().map(guard_request).collect();
    let plan = plan_auto_assignments(&requests, &candidates);

    let inputs: Vec<CreateAssignment> = plan
        .assigned
        .iter()
        .map(|p| CreateAssignment {
            guard_id: p.guard_id,
            professor_id: p.professor_id,
            priority: p.priority,
            reason: p.reason.code().to_string(),
        })
        .collect();
    let created = AssignmentRepo::create_batch(pool, &inputs).await?;

    for guard_id in &plan.unassigned {
        tracing::warn!(guard_id, "No eligible professor for guard");
    }
    tracing::info!(
        requested = guards.len(),
        assigned = created.len(),
        unassigned = plan.unassigned.len(),
        "Auto-assign finished"
    );

    Ok(DispatchOutcome { plan, created })
}
