//! Basket seeding endpoint for the in-memory basket store.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::{BasketId, BuyerId, CatalogItemId};
use domain::{Basket, BasketItem, Money};
use fulfillment::DeliveryIntake;
use serde::{Deserialize, Serialize};

use super::checkout::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct BasketRequest {
    pub id: i64,
    pub buyer_id: String,
    pub items: Vec<BasketLineRequest>,
}

#[derive(Deserialize)]
pub struct BasketLineRequest {
    pub catalog_item_id: i64,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct BasketResponse {
    pub id: i64,
    pub item_count: usize,
}

/// POST /baskets — store a basket with its lines.
#[tracing::instrument(skip(state, req), fields(basket_id = req.id))]
pub async fn create<D: DeliveryIntake + 'static>(
    State(state): State<Arc<AppState<D>>>,
    Json(req): Json<BasketRequest>,
) -> Result<(StatusCode, Json<BasketResponse>), ApiError> {
    let items: Vec<BasketItem> = req
        .items
        .iter()
        .map(|line| {
            BasketItem::new(
                CatalogItemId::new(line.catalog_item_id),
                Money::from_cents(line.unit_price_cents),
                line.quantity,
            )
        })
        .collect();

    let item_count = items.len();
    let basket = Basket::new(BasketId::new(req.id), BuyerId::new(req.buyer_id), items);
    state.baskets.insert(basket);

    Ok((
        StatusCode::CREATED,
        Json(BasketResponse {
            id: req.id,
            item_count,
        }),
    ))
}
