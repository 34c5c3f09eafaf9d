use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use common_auth::{parse_bearer, AccessPolicy, AuthError, Role};
use tracing::{error, warn};

use crate::app::AppState;

/// Verified identity attached to the request after the guard admits it.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub username: String,
    pub role: Role,
}

/// Role-based access guard, run once per request in front of every
/// protected operation.
///
/// The route's [`AccessPolicy`] is captured in the layer state at
/// registration time. The check sequence short-circuits at the first
/// failure and the handler never runs on a rejection: public check, bearer
/// extraction, signature and expiry verification, revocation check, role
/// requirement.
pub async fn access_guard(
    State((state, policy)): State<(AppState, AccessPolicy)>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if policy.public {
        return Ok(next.run(request).await);
    }

    let mut request = request;
    match admit(&state, policy, &mut request).await {
        Ok(()) => Ok(next.run(request).await),
        Err(err) => {
            state.metrics.guard_rejection(err.kind());
            Err(err)
        }
    }
}

async fn admit(
    state: &AppState,
    policy: AccessPolicy,
    request: &mut Request,
) -> Result<(), AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let token = parse_bearer(header)?;

    let claims = state
        .codec
        .verify(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    let revoked = state
        .revocations
        .find_by_token(&token)
        .await
        .map_err(|err| {
            error!(error = %err, "Revocation lookup failed");
            AuthError::Internal
        })?;
    if revoked.is_some() {
        // A logged-out token is indistinguishable from a cryptographically
        // invalid one from the caller's perspective.
        warn!(username = %claims.username, "Rejected revoked token");
        return Err(AuthError::InvalidToken);
    }

    if !policy.allows(claims.role) {
        return Err(AuthError::InsufficientRole {
            required: policy.required_roles.to_vec(),
        });
    }

    request.extensions_mut().insert(AuthIdentity {
        username: claims.username,
        role: claims.role,
    });
    Ok(())
}
