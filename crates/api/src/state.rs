use async_trait::async_trait;
use solver_cp::CpSolver;
use solver_search::SearchSolver;
use std::sync::Arc;
use store::ScheduleStore;
use timetable_core::{PlacementProblem, Solver};
use types::{Snapshot, SolveOptions, SolveOutcome, SolverKind};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScheduleStore>,
    pub solver: Arc<DispatchSolver>,
}

impl AppState {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            store: Arc::new(ScheduleStore::new(snapshot)),
            solver: Arc::new(DispatchSolver::new()),
        }
    }
}

/// Routes a solve to the requested backend.
pub struct DispatchSolver {
    cp: CpSolver,
    search: SearchSolver,
}

impl DispatchSolver {
    pub fn new() -> Self {
        Self {
            cp: CpSolver::new(),
            search: SearchSolver::new(),
        }
    }
}

impl Default for DispatchSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Solver for DispatchSolver {
    async fn solve(
        &self,
        problem: PlacementProblem,
        opts: SolveOptions,
    ) -> anyhow::Result<SolveOutcome> {
        match opts.solver {
            SolverKind::Cp => self.cp.solve(problem, opts).await,
            SolverKind::Search => self.search.solve(problem, opts).await,
        }
    }
}
