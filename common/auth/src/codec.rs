use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::claims::{Claims, ClaimsRepr};
use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Runtime configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Validity window applied to newly signed tokens.
    pub ttl_seconds: i64,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u64,
}

impl TokenConfig {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            leeway_seconds: 0,
        }
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}

/// A freshly signed token together with its validity window.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

/// Signs and verifies bearer tokens with a single shared HMAC secret.
///
/// The secret is injected at construction and never read from the
/// environment inside verification logic.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: TokenConfig,
}

impl TokenCodec {
    pub fn new(secret: &[u8], config: TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            config,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue a signed token carrying `{username, role}` with the configured
    /// validity window.
    pub fn sign(&self, username: &str, role: Role) -> AuthResult<SignedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.ttl_seconds);
        let repr = ClaimsRepr {
            sub: username.to_owned(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &repr, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;

        Ok(SignedToken {
            token,
            expires_at,
            expires_in: self.config.ttl_seconds,
        })
    }

    /// Verify signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway_seconds;

        let token_data = decode::<ClaimsRepr>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = Claims::try_from(token_data.claims)?;
        debug!(username = %claims.username, "verified token");
        Ok(claims)
    }

    /// Structurally decode the claims without checking signature or expiry.
    ///
    /// Revocation must accept tokens on the verge of expiry, or already past
    /// it, so it can record the expiry claim for cleanup.
    pub fn decode_insecure(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.leeway = 0;
        validation.validate_exp = false;

        let token_data = decode::<ClaimsRepr>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::MalformedToken)?;
        Claims::try_from(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn codec(ttl_seconds: i64) -> TokenCodec {
        TokenCodec::new(SECRET, TokenConfig::new(ttl_seconds))
    }

    #[test]
    fn sign_then_verify_round_trips_claims() {
        let codec = codec(3600);
        let signed = codec.sign("alice", Role::Admin).expect("sign");
        assert_eq!(signed.expires_in, 3600);

        let claims = codec.verify(&signed.token).expect("verify");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.expires_at.timestamp(), signed.expires_at.timestamp());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let signed = codec(3600).sign("alice", Role::Viewer).expect("sign");
        let other = TokenCodec::new(b"another-secret", TokenConfig::new(3600));
        let err = other.verify(&signed.token).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let signed = codec(3600).sign("alice", Role::Viewer).expect("sign");
        let mut tampered = signed.token;
        tampered.pop();
        tampered.push('x');
        assert!(codec(3600).verify(&tampered).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let signed = codec(-120).sign("alice", Role::Admin).expect("sign");
        let err = codec(3600).verify(&signed.token).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn decode_insecure_accepts_expired_token() {
        let signed = codec(-120).sign("alice", Role::Admin).expect("sign");
        let claims = codec(3600)
            .decode_insecure(&signed.token)
            .expect("structural decode");
        assert_eq!(claims.username, "alice");
        assert!(claims.expires_at < Utc::now());
    }

    #[test]
    fn decode_insecure_rejects_garbage() {
        let err = codec(3600)
            .decode_insecure("not-a-token")
            .expect_err("should reject");
        assert!(matches!(err, AuthError::MalformedToken));
    }
}
