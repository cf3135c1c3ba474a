//! Bearer-token extractor for authenticated routes.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use common::Role;
use store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity taken from a valid `Authorization: Bearer <token>` header.
///
/// Adding this as a handler argument makes the route require a token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
    pub role: Role,
}

impl<S: Store> FromRequestParts<Arc<AppState<S>>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("no auth token provided".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty() && !t.contains(' '))
            .ok_or_else(|| ApiError::Unauthorized("wrong token format".into()))?;

        let claims = state
            .jwt
            .validate(token)
            .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?;

        Ok(AuthUser {
            subject: claims.sub,
            role: claims.role,
        })
    }
}
