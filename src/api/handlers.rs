use super::AppState;
use crate::architectures::{self, ArchitectureInfo};
use crate::PackageInfo;
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

/// Handle health check endpoint
pub async fn health(State(state): State<AppState>) -> Response {
    let uptime = chrono::Utc::now() - state.started_at;
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "promptitecture",
            "version": crate::VERSION,
            "uptime_seconds": uptime.num_seconds(),
        })),
    )
        .into_response()
}

pub async fn version() -> Json<PackageInfo> {
    Json(PackageInfo::current())
}

pub async fn list_architectures() -> Json<Vec<ArchitectureInfo>> {
    Json(architectures::catalog())
}

pub async fn get_architecture(Path(id): Path<String>) -> Response {
    match architectures::lookup(&id) {
        Ok(info) => (StatusCode::OK, Json(info)).into_response(),
        Err(e) => {
            log::debug!("Architecture lookup failed: {}", e);
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
    }
}

pub async fn not_found(uri: Uri) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
