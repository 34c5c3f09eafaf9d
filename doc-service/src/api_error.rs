use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::store::StoreError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// User-facing API error with a stable code and an HTTP status.
///
/// Collaborator faults are logged at the call site and surfaced through
/// [`ApiError::internal`] so no backend detail reaches the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn duplicate_identity() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "DUPLICATE_IDENTITY",
            "Username already taken.",
        )
    }

    /// Deliberately identical for unknown usernames and wrong passwords.
    pub fn invalid_credentials() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid credentials. Please try again.",
        )
    }

    pub fn malformed_token() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "MALFORMED_TOKEN",
            "Token could not be decoded.",
        )
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{what} not found."))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SERVER_ERROR",
            "Internal server error.",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => Self::duplicate_identity(),
            StoreError::NotFound => Self::not_found("Record"),
            StoreError::Backend(_) => Self::internal(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
