//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use generator::{GeneratorError, ProviderErrorKind};
use thiserror::Error;

use crate::types::{ErrorBody, ErrorDetail};

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("HTTP server startup failed on {address}: {message}")]
    ServerStartupFailed { address: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WebServerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;

/// Error returned from a handler, rendered as `{"error": {"kind", "message"}}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Malformed request body or headers
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
    }
}

impl From<GeneratorError> for ApiError {
    fn from(error: GeneratorError) -> Self {
        let status = match &error {
            GeneratorError::InvalidInput { .. } | GeneratorError::UnknownProvider { .. } => StatusCode::BAD_REQUEST,
            GeneratorError::MissingCredential { .. } => StatusCode::UNAUTHORIZED,
            GeneratorError::Provider(e) if e.kind == ProviderErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            GeneratorError::Provider(_) => StatusCode::BAD_GATEWAY,
            GeneratorError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error.kind(), error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
