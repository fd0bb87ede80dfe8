//! Catalog seeding endpoint for the in-memory catalog store.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::CatalogItemId;
use domain::CatalogItem;
use fulfillment::DeliveryIntake;
use serde::{Deserialize, Serialize};

use super::checkout::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CatalogItemRequest {
    pub id: i64,
    pub name: String,
    pub picture_uri: String,
}

#[derive(Serialize)]
pub struct CatalogItemResponse {
    pub id: i64,
}

/// POST /catalog-items — store a catalog item.
#[tracing::instrument(skip(state, req), fields(catalog_item_id = req.id))]
pub async fn create<D: DeliveryIntake + 'static>(
    State(state): State<Arc<AppState<D>>>,
    Json(req): Json<CatalogItemRequest>,
) -> Result<(StatusCode, Json<CatalogItemResponse>), ApiError> {
    state.catalog.insert(CatalogItem::new(
        CatalogItemId::new(req.id),
        req.name,
        req.picture_uri,
    ));

    Ok((StatusCode::CREATED, Json(CatalogItemResponse { id: req.id })))
}
