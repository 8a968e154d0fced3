use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

// Health check endpoint - lightweight
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: the snapshot directory must be readable
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let dir = &state.config.reports.directory;
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => (StatusCode::OK, "ready".to_string()),
        Ok(_) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {} is not a directory", dir.display())),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}: {}", dir.display(), e)),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let mut snapshot = serde_json::to_value(state.metrics.get_snapshot()).unwrap_or_default();
    snapshot["snapshot_cache_entries"] = state.snapshots.len().into();
    Json(snapshot)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
