pub mod state;
pub mod telemetry;
pub mod routes {
    pub mod adjust;
    pub mod generate;
    pub mod health;
    pub mod schedule;
    pub mod snapshot;
    pub mod validate;
}

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::generate::generate,
            routes::adjust::adjust,
            routes::validate::validate_handler,
            routes::schedule::schedule,
            routes::snapshot::get_snapshot,
            routes::snapshot::put_snapshot,
        ),
        components(schemas(
            types::Snapshot, types::ScheduleConfig, types::Teacher, types::Room,
            types::Subject, types::Cohort, types::Assignment, types::Placement,
            types::SolveOptions, types::SolverKind, types::SolveOutcome,
            types::ConstraintCommand, types::TeacherId, types::RoomId,
            types::SubjectId, types::CohortId, types::AssignmentId, types::BlockId,
            types::SlotId,
            routes::generate::GenerateOut, routes::generate::GenerateStats,
            routes::adjust::AdjustIn, routes::adjust::AdjustOut,
            routes::validate::ValidationReport,
            routes::snapshot::SnapshotReplaced
        )),
        tags(
            (name = "schoolsched", description = "School timetabling API")
        )
    )]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/generate", post(routes::generate::generate))
        .route("/v1/adjust", post(routes::adjust::adjust))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/schedule", get(routes::schedule::schedule))
        .route(
            "/v1/snapshot",
            get(routes::snapshot::get_snapshot).put(routes::snapshot::put_snapshot),
        )
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack())
        .with_state(state)
}
