//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps the service error taxonomy to HTTP status codes and the wire-level
//! failure body `{"status":"failure","message":…}`.
//! Never exposes internal error details in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::state::StoreError;

/// JSON body returned for every error response.
///
/// All failure cases — bad input, missing auth, internal faults — share
/// this shape for consistency across the API surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FailureBody {
    /// Always `"failure"`.
    pub status: String,
    /// Human-readable failure message.
    pub message: String,
}

impl FailureBody {
    /// Build a failure body with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "failure".to_string(),
            message: message.into(),
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Maps the license service's error taxonomy to HTTP status codes and the
/// failure body. Internal causes (including store-level key conflicts,
/// which the service does not retry) are logged server-side and replaced
/// with a generic message client-side.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or mismatched authorization token (401).
    #[error("unauthorized request")]
    Unauthorized,

    /// Malformed or semantically invalid input — missing fields,
    /// unparseable duration, unknown key, expired key (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Store-level uniqueness violation. Unhandled at the service layer:
    /// reported to the caller as an internal error (500), cause logged.
    #[error("store conflict: {0}")]
    Conflict(String),

    /// Any unexpected failure, including store and connectivity faults (500).
    /// Message is logged but never returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Return the message presented to the client.
    fn client_message(&self) -> String {
        match self {
            Self::Unauthorized => "Unauthorized request".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            // Never expose internal causes to clients.
            Self::Conflict(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server-side errors for operator visibility.
        match &self {
            Self::Conflict(_) => tracing::error!(error = %self, "license key conflict"),
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            _ => {}
        }

        let body = FailureBody::new(self.client_message());
        (self.status(), Json(body)).into_response()
    }
}

/// Store conflicts propagate as internal errors, per the service's
/// no-retry policy on key generation collisions.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(key) => Self::Conflict(format!("duplicate license key {key}")),
        }
    }
}
