pub mod diagnose;
pub mod domain;
pub mod expand;
pub mod grid;
pub mod validate;

use async_trait::async_trait;
use tracing::info;

pub use domain::{build_problem, Candidate, PlacementProblem};
pub use grid::SlotGrid;
pub use types::{Placement, Snapshot, SolveOptions, SolveOutcome};
pub use validate::{validate, ConfigError};

/// Failure text for solver-level infeasibility, where no single block can
/// be blamed.
pub const CONFLICT_ERROR: &str =
    "Mathematical Conflict: too many overlapping classes at the same time.";

#[async_trait]
pub trait Solver: Send + Sync + 'static {
    async fn solve(
        &self,
        problem: PlacementProblem,
        opts: SolveOptions,
    ) -> anyhow::Result<SolveOutcome>;
}

/// Runs one complete solve over an immutable snapshot: validation, block
/// expansion, domain generation, pre-diagnosis, and the solver itself.
/// Every failure mode comes back as a `SolveOutcome::Failure` value; the
/// previous schedule is the caller's to keep until it sees a success.
pub async fn generate<S: Solver + ?Sized>(
    solver: &S,
    snapshot: &Snapshot,
    opts: SolveOptions,
) -> SolveOutcome {
    if let Err(err) = validate::validate(snapshot) {
        return SolveOutcome::failure(err.to_string());
    }

    let grid = SlotGrid::new(&snapshot.config);
    let blocks = expand::expand_assignments(
        &snapshot.assignments,
        &snapshot.subjects,
        &snapshot.cohorts,
        snapshot.config.max_block_duration,
    );
    info!(
        assignments = snapshot.assignments.len(),
        blocks = blocks.len(),
        "expanded assignments into schedulable blocks"
    );

    let problem = domain::build_problem(snapshot, grid, blocks);
    if let Some(reason) = diagnose::first_empty_domain(&problem, &snapshot.teachers) {
        return SolveOutcome::failure(reason);
    }

    match solver.solve(problem, opts).await {
        Ok(outcome) => outcome,
        Err(err) => SolveOutcome::failure(err.to_string()),
    }
}
