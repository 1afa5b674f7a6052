//! Application state management
//!
//! Shared state passed to every handler through Axum's state extraction.
//! Built once at startup and read-only afterwards; cloning only bumps
//! reference counts.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::Store;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Repositories for every table
    pub store: Store,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT service holding the process-wide signing key
    pub jwt: JwtService,
}

impl AppState {
    /// Create the application state
    ///
    /// Derives the JWT keys from the configured secret. Call once at
    /// startup.
    pub fn new(store: Store, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_expiry_secs);

        Self {
            store,
            config: Arc::new(config),
            jwt,
        }
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
