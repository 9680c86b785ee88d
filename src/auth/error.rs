use thiserror::Error;

pub type CryptResult<T> = std::result::Result<T, CryptError>;

#[derive(Debug, Error)]
pub enum CryptError {
    #[error("password hashing error: {0}")]
    PasswordHashError(#[from] argon2::password_hash::Error),
    #[error("session token error: {0}")]
    SessionTokenError(#[from] jsonwebtoken::errors::Error),
}
