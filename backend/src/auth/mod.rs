//! Authentication module
//!
//! Provides JWT-based authentication with bcrypt password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, ALGORITHM};
pub use middleware::{extract_identity, require_auth, AuthenticatedIdentity};
pub use password::{PasswordService, HASH_COST};
