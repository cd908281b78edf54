use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use types::{SolveOptions, SolveOutcome};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerateOut {
    Success {
        message: String,
        stats: GenerateStats,
    },
    Failure {
        error: String,
    },
}

#[derive(Serialize, ToSchema)]
pub struct GenerateStats {
    pub assignments: usize,
    pub blocks_scheduled: usize,
}

#[utoipa::path(
    post,
    path = "/v1/generate",
    request_body = SolveOptions,
    responses((status = 200, description = "Solve attempted", body = GenerateOut))
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(opts): Json<SolveOptions>,
) -> Json<GenerateOut> {
    let snapshot = state.store.snapshot();
    let assignments = snapshot.assignments.len();
    match timetable_core::generate(&*state.solver, &snapshot, opts).await {
        SolveOutcome::Success { data } => {
            let blocks_scheduled = data.len();
            state.store.replace_schedule(data);
            Json(GenerateOut::Success {
                message: "Schedule generated".into(),
                stats: GenerateStats {
                    assignments,
                    blocks_scheduled,
                },
            })
        }
        // The previous schedule stays in place.
        SolveOutcome::Failure { error } => Json(GenerateOut::Failure { error }),
    }
}
