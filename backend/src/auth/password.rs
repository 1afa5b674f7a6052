//! Password hashing using bcrypt
//!
//! Provides salted password hashing and verification.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. Request handlers should use the
//! `_async` variants, which run on the blocking thread pool.

use meowapi_shared::validation::MAX_PASSWORD_BYTES;
use meowapi_shared::AuthError;
use tracing::debug;

/// bcrypt work factor. Fixed on purpose; stored hashes embed it.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using bcrypt (blocking operation)
    ///
    /// Passwords over 72 bytes are refused instead of truncated.
    pub fn hash(password: &str) -> Result<String, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordTooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }
        bcrypt::hash(password, HASH_COST).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A mismatch is an error, not `Ok(false)`. A stored value that is not
    /// a bcrypt hash also counts as a mismatch.
    pub fn verify(password: &str, hash: &str) -> Result<(), AuthError> {
        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                debug!("Stored password hash rejected: {}", e);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<(), AuthError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
    }
}
