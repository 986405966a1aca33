//! Authentication Module
//!
//! JWT session tokens, the single env-configured admin account, and the
//! middleware protecting the admin API.

pub mod credentials;
pub mod jwt;
pub mod middleware;

pub use credentials::{AdminCredentials, CredentialsError};
pub use jwt::{AdminSession, Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{SESSION_COOKIE, require_auth, token_from_headers};
