// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The Garmin Connect sign-in handshake failed.
    #[error("{0}")]
    Authentication(String),

    /// The activity listing request failed.
    #[error("{0}")]
    Fetch(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message returned for every authentication failure. Never carries
    /// details from the request so credentials cannot leak through it.
    pub const AUTHENTICATION_FAILED: &'static str = "Failed to authenticate with Garmin Connect";

    /// Message returned for every activity listing failure.
    pub const FETCH_FAILED: &'static str = "Failed to fetch activities from Garmin Connect";

    pub fn authentication() -> Self {
        AppError::Authentication(Self::AUTHENTICATION_FAILED.to_string())
    }

    pub fn fetch() -> Self {
        AppError::Fetch(Self::FETCH_FAILED.to_string())
    }

    /// Whether the failure came from the upstream fitness service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Authentication(_) | AppError::Fetch(_))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    retryable: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details, retryable) = match &self {
            AppError::Authentication(msg) => (
                StatusCode::BAD_GATEWAY,
                "authentication_error",
                Some(msg.clone()),
                true,
            ),
            AppError::Fetch(msg) => (
                StatusCode::BAD_GATEWAY,
                "fetch_error",
                Some(msg.clone()),
                true,
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                Some(msg.clone()),
                false,
            ),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    None,
                    false,
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            retryable,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
