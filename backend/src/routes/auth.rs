//! Signup and login routes
//!
//! Neither route requires a token. Password hashing runs on the blocking
//! thread pool.

use crate::error::ApiResult;
use crate::repositories::UserRecord;
use crate::services::AuthService;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use meowapi_shared::types::{Credentials, TokenResponse};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Register a new user
///
/// POST /signup
///
/// Responds with the stored user; `password` is always empty.
async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<UserRecord>> {
    let Json(creds) = payload?;
    let user = AuthService::signup(state.store().users.as_ref(), creds).await?;
    Ok(Json(user))
}

/// Login with name and password
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(creds) = payload?;
    let token = AuthService::login(state.store().users.as_ref(), state.jwt(), creds).await?;
    Ok(Json(token))
}
