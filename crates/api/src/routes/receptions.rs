//! Reception endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::PvzId;
use store::Store;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::routes::dto::{OpenReceptionRequest, ReceptionResponse};
use crate::state::AppState;

/// POST /receptions — open a reception at a pickup point.
#[tracing::instrument(skip(state, payload), fields(subject = %user.subject))]
pub async fn open<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    payload: Result<Json<OpenReceptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReceptionResponse>), ApiError> {
    let Json(req) = payload?;
    let reception = state
        .receptions
        .open_reception(&PvzId::new(req.pvz_id), user.role)
        .await?;
    state.observer.reception_created();

    Ok((StatusCode::CREATED, Json(reception.into())))
}

/// POST /pvz/{pvzId}/close_last_reception — close the open reception.
#[tracing::instrument(skip(state), fields(subject = %user.subject))]
pub async fn close_last<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(pvz_id): Path<String>,
) -> Result<Json<ReceptionResponse>, ApiError> {
    let reception = state
        .receptions
        .close_last_reception(&PvzId::new(pvz_id), user.role)
        .await?;
    Ok(Json(reception.into()))
}
