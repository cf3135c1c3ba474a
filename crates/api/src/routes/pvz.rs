//! Pickup-point endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{DateRange, Page, PvzId};
use domain::NewPvz;
use store::Store;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::routes::dto::{CreatePvzRequest, ListPvzQuery, PvzListItem, PvzResponse};
use crate::state::AppState;

/// POST /pvz — register a pickup point. Missing id and date default to a
/// fresh UUID and the current time.
#[tracing::instrument(skip(state, payload), fields(subject = %user.subject))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    payload: Result<Json<CreatePvzRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PvzResponse>), ApiError> {
    let Json(req) = payload?;
    let new = NewPvz {
        id: req
            .id
            .map_or_else(|| PvzId::new(Uuid::new_v4().to_string()), PvzId::new),
        registration_date: req.registration_date.unwrap_or_else(Utc::now),
        city: req.city,
    };

    let pvz = state.pvz.create_pvz(new, user.role).await?;
    state.observer.pvz_created();

    Ok((StatusCode::CREATED, Json(pvz.into())))
}

/// GET /pvz — list pickup points with their receptions and products.
#[tracing::instrument(skip(state), fields(subject = %user.subject))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ListPvzQuery>,
) -> Result<Json<Vec<PvzListItem>>, ApiError> {
    let start = parse_date(query.start_date.as_deref(), "invalid startDate")?;
    let end = parse_date(query.end_date.as_deref(), "invalid endDate")?;
    let page = Page::or_default(
        query.page.and_then(|p| p.parse().ok()),
        query.limit.and_then(|l| l.parse().ok()),
    );

    let listing = state
        .pvz
        .list_pvz(DateRange::new(start, end), page)
        .await?;

    Ok(Json(listing.into_iter().map(Into::into).collect()))
}

/// Parses an optional RFC 3339 timestamp; an empty value counts as absent.
fn parse_date(value: Option<&str>, error: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => DateTime::parse_from_rfc3339(v)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|_| ApiError::BadRequest(error.to_string())),
    }
}
