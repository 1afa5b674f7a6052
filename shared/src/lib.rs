//! Meow API Shared Library
//!
//! Wire types, the authentication error taxonomy and input validation
//! helpers used by the backend and by API clients.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
