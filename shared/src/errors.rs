//! Error types for the Meow API

use thiserror::Error;

/// Authentication error types
///
/// Covers credential checks, token signing and token verification.
/// Messages are safe to show to clients; internal causes are carried
/// only by the variants that map to server-side failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user name or wrong password. Deliberately one variant.
    #[error("Invalid name or password")]
    InvalidCredentials,

    #[error("Password must be {max} bytes or less")]
    PasswordTooLong { max: usize },

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,

    #[error("Signing key is not configured")]
    MissingSigningKey,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// A handler asked for the caller's identity on a request that
    /// never went through the token verifier.
    #[error("Authenticated identity not present on request")]
    IdentityNotPresent,
}

impl AuthError {
    /// Whether this error is the client's fault (4xx) rather than ours (5xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::PasswordTooLong { .. }
                | AuthError::TokenExpired
                | AuthError::InvalidToken
                | AuthError::MissingToken
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_side_errors_are_not_client_errors() {
        assert!(!AuthError::MissingSigningKey.is_client_error());
        assert!(!AuthError::Signing("boom".into()).is_client_error());
        assert!(!AuthError::Hashing("rng".into()).is_client_error());
        assert!(!AuthError::IdentityNotPresent.is_client_error());
    }

    #[test]
    fn test_invalid_credentials_message_does_not_leak_cause() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid name or password"
        );
    }
}
