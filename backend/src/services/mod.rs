//! Business logic services
//!
//! Services sit between the route handlers and the repositories.

pub mod auth;
pub mod resource;

pub use auth::AuthService;
pub use resource::ResourceService;
