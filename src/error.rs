use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::du::DuError;

/// Body of every 404 the report server produces.
pub const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";

/// The primary error type for the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// A location, snapshot or route that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A snapshot that could not be read or parsed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] DuError),
    #[error("I/O error: {0}")]
    IoError(String),
    /// Internal server errors that are not expected to be handled by the client.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The plain HTML 404 page.
pub fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=UTF-8")],
        NOT_FOUND_BODY,
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                return not_found_response();
            }
            AppError::Snapshot(err) => {
                // Broken snapshots look like missing ones to the client.
                tracing::warn!("Snapshot error: {}", err);
                return not_found_response();
            }
            AppError::IoError(msg) => {
                tracing::error!("I/O error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "An I/O error occurred".to_string(),
                    Some(json!({ "details": msg })),
                )
            }
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["error"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            kind => AppError::IoError(format!("{}: {}", kind, err)),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(anyhow::anyhow!("background task failed: {}", err))
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
