//! Signup and login
//!
//! Password hashing and verification run on the blocking thread pool.
//! The JWT service is passed by reference with its keys already derived.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{UniqueViolation, UserRecord, UserRepository};
use chrono::Utc;
use meowapi_shared::types::{Credentials, TokenResponse};
use meowapi_shared::validation::validate_password;
use tracing::{error, info, warn};

/// Authentication operations against the credential store
pub struct AuthService;

impl AuthService {
    /// Register a new user
    ///
    /// Returns the stored record with its password cleared.
    pub async fn signup(
        users: &dyn UserRepository,
        creds: Credentials,
    ) -> Result<UserRecord, ApiError> {
        let existing = users.find_by_name(&creds.name).await.map_err(|e| {
            error!("User lookup failed during signup: {:?}", e);
            ApiError::Internal(e)
        })?;
        if existing.is_some() {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        validate_password(&creds.password).map_err(ApiError::Validation)?;

        let hash = PasswordService::hash_async(creds.password).await?;

        let mut user = UserRecord {
            name: creds.name,
            password: hash,
            ..Default::default()
        };
        user.before_insert(Utc::now());

        // The lookup above can race another signup for the same name
        let user = users.insert(user).await.map_err(|e| {
            if e.is::<UniqueViolation>() {
                ApiError::Conflict("User already exists".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(user_id = user.id, "User signed up");
        Ok(user.without_password())
    }

    /// Check credentials and issue a token
    ///
    /// Unknown names, failed lookups and wrong passwords all produce the
    /// same error.
    pub async fn login(
        users: &dyn UserRepository,
        jwt: &JwtService,
        creds: Credentials,
    ) -> Result<TokenResponse, ApiError> {
        let user = match users.find_by_name(&creds.name).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Login attempt for unknown user");
                return Err(ApiError::InvalidCredentials);
            }
            Err(e) => {
                warn!("User lookup failed during login: {:?}", e);
                return Err(ApiError::InvalidCredentials);
            }
        };

        if let Err(e) = PasswordService::verify_async(creds.password, user.password).await {
            warn!(user_id = user.id, "Login rejected: {}", e);
            return Err(e.into());
        }

        let token = jwt.issue_token(user.id, &user.name)?;

        info!(user_id = user.id, "User logged in");
        Ok(TokenResponse { token })
    }
}
