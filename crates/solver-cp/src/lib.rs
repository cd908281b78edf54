#[cfg(feature = "with-milp")]
mod model;

use async_trait::async_trait;
use solver_search::SearchSolver;
use timetable_core::{PlacementProblem, Solver};
use tracing::info;
use types::{SolveOptions, SolveOutcome};

/// CP-style solver over the block placement model: a Boolean decision per
/// admitted triple, exactly-one per block, slot-indexed mutual exclusion
/// for rooms, teachers and cohorts. Solved by CBC through `good_lp` when
/// built with `--features with-milp`; without the backend, or if it
/// errors, the exact backtracking search takes over with identical
/// semantics.
pub struct CpSolver;

impl CpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Solver for CpSolver {
    async fn solve(
        &self,
        problem: PlacementProblem,
        opts: SolveOptions,
    ) -> anyhow::Result<SolveOutcome> {
        info!(
            blocks = problem.blocks.len(),
            candidates = problem.candidate_count(),
            "building placement model"
        );
        #[cfg(feature = "with-milp")]
        {
            match model::solve_with_cbc(&problem, &opts) {
                Ok(outcome) => return Ok(outcome),
                Err(err) => tracing::warn!(%err, "milp backend failed, falling back to search"),
            }
        }
        SearchSolver::new().solve(problem, opts).await
    }
}
