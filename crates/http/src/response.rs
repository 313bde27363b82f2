//! JSON response envelope shared by every endpoint.
//!
//! Success bodies look like `{"status": "success", "message"?: .., "data"?: ..}`,
//! failures like `{"status": "fail" | "error", "message": ..}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Outcome category carried in the envelope's `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    /// The client sent something we refuse to act on.
    Fail,
    /// The server could not honour a valid request.
    Error,
}

/// Standard body for every response.
#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Envelope<()> {
    /// Failure body with a human-readable reason.
    pub fn failure(status: EnvelopeStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// A successful response: HTTP status plus envelope.
#[derive(Debug)]
pub struct ApiResponse<T = ()> {
    code: StatusCode,
    envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    /// 200 with a data payload and no message.
    pub fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK,
            envelope: Envelope {
                status: EnvelopeStatus::Success,
                message: None,
                data: Some(data),
            },
        }
    }

    /// 201 with a message and a data payload.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            code: StatusCode::CREATED,
            envelope: Envelope {
                status: EnvelopeStatus::Success,
                message: Some(message.into()),
                data: Some(data),
            },
        }
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK,
            envelope: Envelope {
                status: EnvelopeStatus::Success,
                message: Some(message.into()),
                data: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self.envelope)).into_response()
    }
}
