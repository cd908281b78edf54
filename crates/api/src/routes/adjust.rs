use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use types::{ConstraintCommand, SolveOptions, SolveOutcome};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AdjustIn {
    #[serde(default)]
    pub commands: Vec<ConstraintCommand>,
}

#[derive(Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AdjustOut {
    Success { message: String },
    Warning { message: String },
    Error { message: String },
}

/// Applies constraint edits, then re-solves deterministically. A solver
/// failure keeps the edits but leaves the previous schedule untouched.
#[utoipa::path(
    post,
    path = "/v1/adjust",
    request_body = AdjustIn,
    responses((status = 200, description = "Adjustment attempted", body = AdjustOut))
)]
pub async fn adjust(
    State(state): State<AppState>,
    Json(input): Json<AdjustIn>,
) -> Json<AdjustOut> {
    let mut confirmations = Vec::new();
    for command in &input.commands {
        match state.store.apply(command) {
            Ok(message) => confirmations.push(message),
            Err(err) => {
                return Json(AdjustOut::Error {
                    message: err.to_string(),
                })
            }
        }
    }

    let snapshot = state.store.snapshot();
    match timetable_core::generate(&*state.solver, &snapshot, SolveOptions::default()).await {
        SolveOutcome::Success { data } => {
            state.store.replace_schedule(data);
            Json(AdjustOut::Success {
                message: format!("Adjusted: {}", confirmations.join(" ")),
            })
        }
        SolveOutcome::Failure { .. } => Json(AdjustOut::Warning {
            message: "Constraint saved, but schedule generation failed.".into(),
        }),
    }
}
