use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use common_auth::{BearerToken, Role};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::app::AppState;
use crate::guard::AuthIdentity;
use crate::store::{NewUser, RevokedToken, StoreError};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let RegisterRequest {
        username,
        password,
        role,
    } = request;

    let username = username.trim().to_owned();
    if username.is_empty() {
        return Err(ApiError::validation("Username must not be empty"));
    }

    let password_hash = hash_password(&password)?;

    let user = state
        .credentials
        .insert(NewUser {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
        })
        .await
        .map_err(|err| match err {
            StoreError::DuplicateUsername => {
                state.metrics.registration("duplicate");
                ApiError::duplicate_identity()
            }
            other => {
                error!(error = %other, "Failed to persist user");
                ApiError::internal()
            }
        })?;

    state.metrics.registration("success");
    info!(username = %user.username, role = %user.role, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            role: user.role,
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let LoginRequest { username, password } = request;

    // Exact-match lookup. An unknown username and a wrong password produce
    // the same error so usernames cannot be enumerated.
    let user = match state.credentials.find_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            state.metrics.login_attempt("invalid_credentials");
            return Err(ApiError::invalid_credentials());
        }
        Err(err) => {
            error!(error = %err, "Credential lookup failed");
            return Err(ApiError::internal());
        }
    };

    let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|err| {
        error!(error = %err, "Stored password hash is unparsable");
        ApiError::internal()
    })?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        state.metrics.login_attempt("invalid_credentials");
        warn!(username = %user.username, "Login rejected");
        return Err(ApiError::invalid_credentials());
    }

    let signed = state.codec.sign(&user.username, user.role).map_err(|err| {
        error!(error = %err, "Failed to sign token");
        ApiError::internal()
    })?;

    state.metrics.login_attempt("success");
    info!(username = %user.username, "Issued token");

    Ok(Json(LoginResponse {
        access_token: signed.token,
        token_type: "Bearer",
        expires_in: signed.expires_in,
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

/// Revoke the presented token.
///
/// Only a structural decode is performed: a token on the verge of expiry,
/// or already past it, can still be revoked for cleanup. Revocation is
/// orthogonal to signature validity.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<LogoutResponse>, ApiError> {
    let claims = state
        .codec
        .decode_insecure(&token)
        .map_err(|_| ApiError::malformed_token())?;

    let record = RevokedToken {
        token,
        revoked_at: Utc::now(),
        expiry: claims.expires_at,
    };
    state.revocations.insert(record).await.map_err(|err| {
        error!(error = %err, "Failed to persist revocation");
        ApiError::internal()
    })?;

    info!(username = %claims.username, "Token revoked");
    Ok(Json(LogoutResponse {
        message: "Logged out successfully",
    }))
}

/// Guard smoke route requiring the admin role.
pub async fn admin_only(Extension(identity): Extension<AuthIdentity>) -> Json<Value> {
    Json(json!({
        "message": "You have admin access!",
        "username": identity.username,
    }))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    if password.trim().is_empty() {
        return Err(ApiError::validation("Password must not be empty"));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            error!(error = %err, "Failed to hash password");
            ApiError::internal()
        })
}
