//! HS256 access tokens.
//!
//! A token carries the subject id and the caller's [`Role`]. Validation checks
//! the signature and expiry; a payload whose role is outside the closed set
//! fails to decode and is rejected like any other malformed token.

use std::fmt;

use chrono::{Duration, Utc};
use common::Role;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: a user id, or `dummy_<role>` for test logins.
    pub sub: String,
    pub role: Role,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Signing settings for [`JwtService`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in minutes.
    pub token_ttl_minutes: i64,
}

impl JwtConfig {
    pub const DEFAULT_TTL_MINUTES: i64 = 60;

    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_minutes: Self::DEFAULT_TTL_MINUTES,
        }
    }
}

/// Issues and validates tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::minutes(config.token_ttl_minutes),
        }
    }

    /// Signs a token for `subject` acting as `role`.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Checks the signature and expiry of `token` and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
