use axum::{http::StatusCode, Json};
use serde::Serialize;
use timetable_core::{validate, ConfigError};
use types::Snapshot;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = Snapshot,
    responses((status = 200, description = "Validation result", body = ValidationReport))
)]
pub async fn validate_handler(
    Json(snapshot): Json<Snapshot>,
) -> (StatusCode, Json<ValidationReport>) {
    match validate(&snapshot) {
        Ok(()) => (
            StatusCode::OK,
            Json(ValidationReport {
                ok: true,
                errors: vec![],
            }),
        ),
        Err(ConfigError::Msg(msg)) => {
            let errors = msg
                .split(';')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            (StatusCode::OK, Json(ValidationReport { ok: false, errors }))
        }
    }
}
