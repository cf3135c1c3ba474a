//! Credential service for the pickup-point backend.
//!
//! [`JwtService`] issues and validates time-limited HS256 tokens carrying a
//! subject id and a [`Role`](common::Role). The [`password`] module hashes
//! and verifies account passwords.

pub mod error;
pub mod jwt;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtConfig, JwtService};
pub use password::{hash_password, verify_password};
