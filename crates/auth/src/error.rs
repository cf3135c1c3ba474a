use thiserror::Error;

/// Errors raised while issuing or checking credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signing failed, or a token was rejected (bad signature, expired, malformed).
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Hashing failed or a stored hash could not be parsed.
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::PasswordHash(err.to_string())
    }
}
