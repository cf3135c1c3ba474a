//! Product endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::PvzId;
use store::Store;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::routes::dto::{AddProductRequest, ProductResponse};
use crate::state::AppState;

/// POST /products — add a product to the open reception.
#[tracing::instrument(skip(state, payload), fields(subject = %user.subject))]
pub async fn add<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    payload: Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = payload?;
    let product = state
        .products
        .add_product(&req.product_type, &PvzId::new(req.pvz_id), user.role)
        .await?;
    state.observer.product_added();

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// POST /pvz/{pvzId}/delete_last_product — undo the last add.
#[tracing::instrument(skip(state), fields(subject = %user.subject))]
pub async fn delete_last<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(pvz_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .products
        .delete_last_product(&PvzId::new(pvz_id), user.role)
        .await?;
    Ok(StatusCode::OK)
}
