//! Login and registration endpoints. These do not require a token.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use domain::DomainError;
use store::Store;

use crate::error::ApiError;
use crate::routes::dto::{
    DummyLoginRequest, LoginRequest, RegisterRequest, TokenResponse, UserResponse,
};
use crate::state::AppState;

/// POST /dummyLogin — issue a token for a role without an account.
#[tracing::instrument(skip(state, payload))]
pub async fn dummy_login<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<DummyLoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(req) = payload?;
    let token = state.accounts.dummy_login(&req.role)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /register — create an account.
#[tracing::instrument(skip(state, payload))]
pub async fn register<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(req) = payload?;
    let user = state
        .accounts
        .register(&req.email, &req.password, &req.role)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /login — exchange email and password for a token.
#[tracing::instrument(skip(state, payload))]
pub async fn login<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(req) = payload?;
    let token = state
        .accounts
        .login(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            DomainError::UserNotFound | DomainError::WrongPassword => {
                ApiError::Unauthorized(e.to_string())
            }
            other => other.into(),
        })?;
    Ok(Json(TokenResponse { token }))
}
