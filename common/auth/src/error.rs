use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::roles::Role;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization token missing")]
    MissingToken,
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error("token could not be decoded")]
    MalformedToken,
    #[error("insufficient role; required one of: {}", .required.iter().map(|role| role.as_str()).collect::<Vec<_>>().join(", "))]
    InsufficientRole { required: Vec<Role> },
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("internal authentication failure")]
    Internal,
}

impl AuthError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::MalformedToken | AuthError::InvalidClaim(_, _) => "malformed_token",
            AuthError::InsufficientRole { .. } => "insufficient_role",
            AuthError::Signing(_) | AuthError::Internal => "internal",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "MISSING_TOKEN", self.to_string())
            }
            AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", self.to_string())
            }
            AuthError::MalformedToken | AuthError::InvalidClaim(_, _) => {
                (StatusCode::UNAUTHORIZED, "MALFORMED_TOKEN", self.to_string())
            }
            AuthError::InsufficientRole { .. } => {
                (StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE", self.to_string())
            }
            // Never echo internal failure detail to the caller.
            AuthError::Signing(_) | AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERVER_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let body = ErrorBody { code, message };
        (status, Json(body)).into_response()
    }
}
