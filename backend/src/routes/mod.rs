//! Route definitions for the Meow API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::require_auth;
use crate::repositories::{Cat, Item, Toilet, UseToilet, Wash};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod health;
mod resource;

#[cfg(test)]
mod auth_tests;

pub use auth::auth_routes;
pub use resource::resource;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .merge(auth::auth_routes())
        .nest("/api", api_routes(state.clone()))
        // Items predate accounts and stay public
        .route("/item", resource::<Item>())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes behind bearer-token authentication
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/cat", resource::<Cat>())
        .route("/usetoilet", resource::<UseToilet>())
        .route("/wash", resource::<Wash>())
        .route("/wash/:toiletid", get(resource::list_washes_by_toilet))
        .route("/toilet", resource::<Toilet>())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
