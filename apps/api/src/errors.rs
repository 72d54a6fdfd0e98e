use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::import::ImportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Import(err) => import_error_parts(err),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn import_error_parts(err: &ImportError) -> (StatusCode, &'static str, String) {
    let message = err.to_string();
    match err {
        ImportError::NoFile | ImportError::EmptyRequiredField { .. } => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        }
        ImportError::UnsupportedFileType { .. } => {
            (StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE_TYPE", message)
        }
        ImportError::MissingColumns { .. } => (StatusCode::BAD_REQUEST, "MISSING_COLUMNS", message),
        ImportError::Malformed(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "MALFORMED_SPREADSHEET",
            message,
        ),
        ImportError::ImportFailed(_) => {
            tracing::error!("{message}");
            (StatusCode::INTERNAL_SERVER_ERROR, "IMPORT_FAILED", message)
        }
    }
}
