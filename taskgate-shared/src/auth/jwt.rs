/// Bearer token issuing and verification
///
/// Tokens are HS256 JWTs carrying the user id as `sub` and a fixed issuer.
/// A [`TokenSigner`] is built once from configuration and shared; there is no
/// global key material.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use taskgate_shared::auth::jwt::TokenSigner;
///
/// let signer = TokenSigner::new("test-secret-key-at-least-32-bytes-long", Duration::hours(1));
/// let token = signer.issue(42).unwrap();
/// let claims = signer.verify(&token).unwrap();
/// assert_eq!(claims.user_id().unwrap(), 42);
/// ```

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Issuer written into and required from every token
pub const TOKEN_ISSUER: &str = "taskgate";

/// Lifetime used when configuration does not override it
pub fn default_token_ttl() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, decimal
    pub sub: String,

    pub iss: String,

    pub iat: i64,

    pub nbf: i64,

    pub exp: i64,
}

impl Claims {
    fn new(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<UserId, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::InvalidFormat(format!("subject is not a user id: {}", self.sub)))
    }
}

/// Issues and verifies tokens with one shared secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: UserId) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, self.ttl);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(e.to_string()))
    }

    /// Checks signature, issuer, `exp` and `nbf`
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
                    expected: TOKEN_ISSUER.to_string(),
                },
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                    JwtError::InvalidFormat(e.to_string())
                }
                _ => JwtError::ValidationError(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new(SECRET, default_token_ttl());
        let token = signer.issue(7).expect("Should issue token");

        let claims = signer.verify(&token).expect("Should verify token");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenSigner::new(SECRET, default_token_ttl()).issue(1).unwrap();
        let other = TokenSigner::new("another-secret-key-at-least-32-bytes", default_token_ttl());

        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Past the default 60s leeway
        let signer = TokenSigner::new(SECRET, Duration::minutes(-5));
        let token = signer.issue(1).unwrap();

        assert!(matches!(signer.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let mut claims = Claims::new(1, Duration::hours(1));
        claims.iss = "someone-else".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let signer = TokenSigner::new(SECRET, Duration::hours(1));
        assert!(matches!(
            signer.verify(&token),
            Err(JwtError::InvalidIssuer { .. })
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let signer = TokenSigner::new(SECRET, Duration::hours(1));
        assert!(signer.verify("not.a.token").is_err());
        assert!(signer.verify("").is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let mut claims = Claims::new(1, Duration::hours(1));
        claims.sub = "alice".to_string();
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidFormat(_))));
    }

    #[test]
    fn test_debug_hides_keys() {
        let signer = TokenSigner::new(SECRET, Duration::hours(1));
        assert!(!format!("{:?}", signer).contains(SECRET));
    }
}
