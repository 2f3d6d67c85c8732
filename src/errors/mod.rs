//! Error handling module for the community site backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BUNDLE_EMPTY: &str = "BUNDLE_EMPTY";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const EXTRACTION_ERROR: &str = "EXTRACTION_ERROR";
    pub const RELAY_ERROR: &str = "RELAY_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Authentication required or failed
    Unauthorized(String),
    /// Requested asset/table absent
    NotFound(String),
    /// Bundle folder exists but holds no files
    BundleEmpty(String),
    /// Rejected input, no state change
    Validation(String),
    /// Malformed scoreboard table, store left untouched
    Parse(String),
    /// Malformed or unsafe archive upload, live folder left untouched
    Extraction(String),
    /// Mail transport failure surfaced from an admin-initiated send
    Relay(String),
    /// Filesystem failure
    Io(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BundleEmpty(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Extraction(_) => StatusCode::BAD_REQUEST,
            AppError::Relay(_) => StatusCode::BAD_GATEWAY,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::BundleEmpty(_) => codes::BUNDLE_EMPTY,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Parse(_) => codes::PARSE_ERROR,
            AppError::Extraction(_) => codes::EXTRACTION_ERROR,
            AppError::Relay(_) => codes::RELAY_ERROR,
            AppError::Io(_) => codes::IO_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::BundleEmpty(msg)
            | AppError::Validation(msg)
            | AppError::Parse(msg)
            | AppError::Extraction(msg)
            | AppError::Relay(msg)
            | AppError::Io(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        AppError::Io(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        tracing::error!("Archive error: {:?}", err);
        AppError::Extraction(format!("Archive error: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        tracing::error!("CSV error: {:?}", err);
        AppError::Parse(format!("CSV error: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Blocking task failed: {:?}", err);
        AppError::Internal(format!("Blocking task failed: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message().to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
