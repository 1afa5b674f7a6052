//! JWT token generation and validation
//!
//! Tokens are HS512-signed with a symmetric key loaded once at startup.
//! Keys are pre-computed and shared behind `Arc`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use meowapi_shared::AuthError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Signature algorithm for every token this service issues or accepts
pub const ALGORITHM: Algorithm = Algorithm::HS512;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub uid: i64,
    /// User name at login time
    pub name: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
///
/// Built once at startup and stored in `AppState`. An empty secret leaves
/// the service without keys: issuing fails and every token is rejected.
#[derive(Clone)]
pub struct JwtService {
    keys: Option<JwtKeys>,
    validation: Arc<Validation>,
    token_expiry: Duration,
}

impl JwtService {
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        let keys = if secret.is_empty() {
            warn!("JWT signing key is empty; logins will fail and all tokens will be rejected");
            None
        } else {
            Some(JwtKeys::new(secret))
        };

        let mut validation = Validation::new(ALGORITHM);
        // An expiry in the past is expired, no grace period
        validation.leeway = 0;

        Self {
            keys,
            validation: Arc::new(validation),
            token_expiry: Duration::seconds(token_expiry_secs),
        }
    }

    /// Whether a signing key is configured
    pub fn has_signing_key(&self) -> bool {
        self.keys.is_some()
    }

    /// Issue a token for a user, expiring `token_expiry` from now
    #[inline]
    pub fn issue_token(&self, uid: i64, name: &str) -> Result<String, AuthError> {
        self.issue_token_at(uid, name, Utc::now())
    }

    /// Issue a token as if it were `issued_at`
    pub fn issue_token_at(
        &self,
        uid: i64,
        name: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::MissingSigningKey)?;

        let claims = Claims {
            uid,
            name: name.to_string(),
            exp: (issued_at + self.token_expiry).timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, keys.encoding())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validate a token's signature and expiry and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::MissingSigningKey)?;

        decode::<Claims>(token, keys.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn create_test_service() -> JwtService {
        JwtService::new(SECRET, 86400)
    }

    #[test]
    fn test_issue_and_validate_token() {
        let service = create_test_service();

        let token = service.issue_token(42, "tama").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.uid, 42);
        assert_eq!(claims.name, "tama");
    }

    #[test]
    fn test_token_expires_after_24_hours() {
        let service = create_test_service();
        let now = Utc::now();

        let token = service.issue_token_at(1, "mike", now).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.exp, (now + Duration::hours(24)).timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let issued = Utc::now() - Duration::hours(25);

        let token = service.issue_token_at(1, "mike", issued).unwrap();

        assert_eq!(service.validate_token(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_token_header_uses_hs512() {
        let service = create_test_service();
        let token = service.issue_token(7, "kuro").unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let service = create_test_service();
        let claims = Claims {
            uid: 1,
            name: "mike".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service.validate_token(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = create_test_service();
        let other = JwtService::new("a-completely-different-signing-key", 86400);

        let token = other.issue_token(1, "mike").unwrap();

        assert_eq!(service.validate_token(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        let result = service.validate_token("invalid.token.here");

        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_empty_secret_fails_closed() {
        let service = JwtService::new("", 86400);
        assert!(!service.has_signing_key());

        assert_eq!(
            service.issue_token(1, "mike"),
            Err(AuthError::MissingSigningKey)
        );

        // A token signed with an empty HMAC key must not be accepted either
        let forged = encode(
            &Header::new(ALGORITHM),
            &Claims {
                uid: 1,
                name: "mike".to_string(),
                exp: (Utc::now() + Duration::hours(1)).timestamp(),
            },
            &EncodingKey::from_secret(b""),
        )
        .unwrap();
        assert!(service.validate_token(&forged).is_err());
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let cloned = service.clone();
        let token = service.issue_token(3, "shiro").unwrap();
        assert_eq!(cloned.validate_token(&token).unwrap().uid, 3);
    }
}
