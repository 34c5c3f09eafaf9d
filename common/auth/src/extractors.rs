use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderValue};

use crate::error::{AuthError, AuthResult};

/// Raw bearer token pulled from the Authorization header, without any
/// verification. Used where the raw credential itself is the input, such as
/// revocation of a token that may already be expired.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;
        parse_bearer(header).map(Self)
    }
}

/// Parse `Authorization: Bearer <token>`. An absent scheme or empty token is
/// treated the same as an absent header.
pub fn parse_bearer(value: &HeaderValue) -> AuthResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::MissingToken)?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token.to_owned())
}
