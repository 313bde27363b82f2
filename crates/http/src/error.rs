//! Error handling for the bookshelf HTTP layer

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::response::{Envelope, EnvelopeStatus};

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// A business rule rejected the input.
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    NotFound { message: String },

    /// The request could not be decoded at all.
    #[error("{message}")]
    BadRequest { message: String },

    /// A post-write check found the store in an unexpected state.
    #[error("{message}")]
    Inconsistency { message: String },
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create an inconsistency error
    pub fn inconsistency(message: impl Into<String>) -> Self {
        Self::Inconsistency {
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Inconsistency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope status: `fail` for client mistakes, `error` for server faults.
    pub fn envelope_status(&self) -> EnvelopeStatus {
        if self.status_code().is_server_error() {
            EnvelopeStatus::Error
        } else {
            EnvelopeStatus::Fail
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::BadRequest { .. } => "bad_request",
            Self::Inconsistency { .. } => "inconsistency",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status_code();
        let envelope_status = self.envelope_status();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = self.code(),
                status_code = status.as_u16(),
                error = %self,
                "request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = self.code(),
                status_code = status.as_u16(),
                error = %self,
                "request rejected"
            );
        }

        (
            status,
            Json(Envelope::failure(envelope_status, self.to_string())),
        )
            .into_response()
    }
}

/// Result type for handlers.
pub type AppResult<T> = Result<T, AppError>;
