//! HTTP route handlers.
//!
//! - `health`: liveness, readiness, metrics and build information
//! - `report`: the du-diff reports, their stylesheet and per-location indexes

pub mod health;
pub mod report;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// All routes of the report server, without the outer middleware stack.
pub fn router(state: AppState) -> Router {
    let static_service = ServeDir::new(&state.config.reports.static_dir);
    let static_prefix = state.config.reports.static_prefix.clone();

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/version", get(health::version))
        .route("/style.css", get(report::stylesheet))
        .route("/{location}/", get(report::location_index))
        .route("/{location}/{range}", get(report::du_diff_report))
        .nest_service(&static_prefix, static_service)
        .fallback(report::not_found)
        .with_state(state)
}
