use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Application-focused representation of token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Wire representation of the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClaimsRepr {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let issued_at = Utc
            .timestamp_opt(value.iat, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("iat", value.iat.to_string()))?;
        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", value.exp.to_string()))?;

        Ok(Self {
            username: value.sub,
            role: value.role,
            issued_at,
            expires_at,
        })
    }
}

impl From<&Claims> for ClaimsRepr {
    fn from(claims: &Claims) -> Self {
        Self {
            sub: claims.username.clone(),
            role: claims.role,
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        }
    }
}
