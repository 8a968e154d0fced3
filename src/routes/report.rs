use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::du::{self, store};
use crate::error::{not_found_response, AppError, AppResult};
use crate::report::{self, ReportContext, STYLESHEET};
use crate::state::AppState;

const TEXT_SUFFIX: &str = ".txt";

/// `{old}..{new}` with an optional `.txt` suffix selecting the plain-text diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub old: String,
    pub new: String,
    pub text: bool,
}

impl DateRange {
    pub fn parse(s: &str) -> Option<Self> {
        let (range, text) = match s.strip_suffix(TEXT_SUFFIX) {
            Some(range) => (range, true),
            None => (s, false),
        };
        let (old, new) = range.split_once("..")?;
        if !store::is_snapshot_date(old) || !store::is_snapshot_date(new) {
            return None;
        }
        Some(Self { old: old.to_string(), new: new.to_string(), text })
    }
}

fn respond(state: &AppState, result: AppResult<Response>) -> Response {
    match result {
        Ok(res) => res,
        Err(err) => {
            if matches!(err, AppError::NotFound(_) | AppError::Snapshot(_)) {
                state.metrics.inc_not_found();
            }
            err.into_response()
        }
    }
}

async fn require_location_dir(state: &AppState, location: &str) -> AppResult<std::path::PathBuf> {
    if !store::is_valid_location(location) {
        return Err(AppError::NotFound(format!("invalid location {:?}", location)));
    }
    let dir = state.location_dir(location);
    match tokio::fs::metadata(&dir).await {
        Ok(meta) if meta.is_dir() => Ok(dir),
        _ => Err(AppError::NotFound(format!("no such location {:?}", location))),
    }
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=UTF-8")], STYLESHEET)
}

pub async fn du_diff_report(
    State(state): State<AppState>,
    Path((location, range)): Path<(String, String)>,
) -> Response {
    let result = render_du_diff(&state, &location, &range).await;
    respond(&state, result)
}

async fn render_du_diff(state: &AppState, location: &str, range: &str) -> AppResult<Response> {
    let range = DateRange::parse(range)
        .ok_or_else(|| AppError::NotFound(format!("not a date range: {:?}", range)))?;
    let dir = require_location_dir(state, location).await?;

    let old = state.snapshots.load(&store::snapshot_path(&dir, &range.old), &state.metrics).await?;
    let new = state.snapshots.load(&store::snapshot_path(&dir, &range.new), &state.metrics).await?;

    if range.text {
        let body = tokio::task::spawn_blocking(move || du::format_du_diff(&du::du_diff(&old, &new))).await?;
        state.metrics.inc_text_reports();
        return Ok(([(header::CONTENT_TYPE, "text/plain; charset=UTF-8")], body).into_response());
    }

    let location = location.to_string();
    let prefix = state.config.server.base_path.clone();
    let static_prefix = state.config.reports.static_prefix.clone();
    let html = tokio::task::spawn_blocking(move || {
        let rows = du::du_diff(&old, &new);
        report::render_report(&ReportContext {
            location: &location,
            old: &range.old,
            new: &range.new,
            rows: &rows,
            prefix: &prefix,
            static_prefix: &static_prefix,
        })
    })
    .await?;
    state.metrics.inc_reports_rendered();
    Ok(([(header::CONTENT_TYPE, "text/html; charset=UTF-8")], html).into_response())
}

pub async fn location_index(State(state): State<AppState>, Path(location): Path<String>) -> Response {
    let result = render_location_index(&state, &location).await;
    respond(&state, result)
}

async fn render_location_index(state: &AppState, location: &str) -> AppResult<Response> {
    let dir = require_location_dir(state, location).await?;
    let snapshots = tokio::task::spawn_blocking(move || store::list_snapshots(&dir)).await??;
    let html = report::render_index(
        location,
        &snapshots,
        &state.config.server.base_path,
        &state.config.reports.static_prefix,
    );
    Ok(([(header::CONTENT_TYPE, "text/html; charset=UTF-8")], html).into_response())
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    state.metrics.inc_not_found();
    not_found_response()
}
