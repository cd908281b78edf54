use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use types::Snapshot;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct SnapshotReplaced {
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/v1/snapshot",
    responses((status = 200, description = "Current entity snapshot", body = Snapshot))
)]
pub async fn get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.store.snapshot())
}

#[utoipa::path(
    put,
    path = "/v1/snapshot",
    request_body = Snapshot,
    responses((status = 200, description = "Snapshot replaced", body = SnapshotReplaced))
)]
pub async fn put_snapshot(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> Json<SnapshotReplaced> {
    state.store.replace_snapshot(snapshot);
    Json(SnapshotReplaced { status: "ok" })
}
