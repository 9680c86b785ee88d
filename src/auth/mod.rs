mod password;
pub use password::{hash_password, verify_password};
mod jwt;
pub use jwt::{SessionClaims, generate_token, process_token};
mod error;
pub use error::{CryptError, CryptResult};

/// Lifetime of a session cookie.
pub const SESSION_TTL_HOURS: i64 = 24;
