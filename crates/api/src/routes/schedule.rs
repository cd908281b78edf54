use crate::state::AppState;
use axum::{extract::State, Json};
use std::collections::HashMap;
use types::Placement;

/// The stored timetable, ordered for display: configured day order, then
/// period, then cohort.
#[utoipa::path(
    get,
    path = "/v1/schedule",
    responses((status = 200, description = "Current schedule", body = [Placement]))
)]
pub async fn schedule(State(state): State<AppState>) -> Json<Vec<Placement>> {
    let snapshot = state.store.snapshot();
    let day_order: HashMap<&str, usize> = snapshot
        .config
        .days
        .iter()
        .enumerate()
        .map(|(i, d)| (d.as_str(), i))
        .collect();

    let mut placements = state.store.schedule();
    placements.sort_by_key(|p| {
        let (day, period) = p.slot_id.parts().unwrap_or(("", 0));
        (
            day_order.get(day).copied().unwrap_or(usize::MAX),
            period,
            p.cohort_name.clone(),
        )
    });
    Json(placements)
}
