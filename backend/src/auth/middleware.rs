//! Authentication middleware
//!
//! `require_auth` verifies the bearer token once per request and stores an
//! [`AuthenticatedIdentity`] in the request extensions. Handlers take the
//! identity as an extractor; it never re-parses the token.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts, Extensions, HeaderMap},
    middleware::Next,
    response::Response,
};
use meowapi_shared::AuthError;
use tracing::debug;

use super::jwt::Claims;

/// Identity of the caller, taken from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: i64,
    pub name: String,
}

impl From<Claims> for AuthenticatedIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.uid,
            name: claims.name,
        }
    }
}

/// Pull the bearer token out of the `Authorization` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

/// Middleware that rejects requests without a valid, unexpired token
///
/// Apply with `axum::middleware::from_fn_with_state` to a group of routes.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).map_err(|e| {
        debug!("Rejected request: {}", e);
        ApiError::Unauthorized(e.to_string())
    })?;

    // Any verification failure is a 401, including a missing signing key
    let claims = state.jwt().validate_token(token).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::Unauthorized(e.to_string())
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedIdentity::from(claims));

    Ok(next.run(request).await)
}

/// Read the caller's user id from a request that passed `require_auth`
pub fn extract_identity(extensions: &Extensions) -> Result<i64, AuthError> {
    extensions
        .get::<AuthenticatedIdentity>()
        .map(|identity| identity.user_id)
        .ok_or(AuthError::IdentityNotPresent)
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or(ApiError::IdentityNotPresent)
    }
}
