//! Checkout endpoint: turns a basket into an order and fans it out.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use broker::ChannelSender;
use common::BasketId;
use domain::Address;
use fulfillment::{DeliveryIntake, OrderCoordinator};
use serde::{Deserialize, Serialize};
use stores::{InMemoryBasketStore, InMemoryCatalogStore, InMemoryOrderStore};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<D: DeliveryIntake> {
    pub coordinator: OrderCoordinator<
        InMemoryBasketStore,
        InMemoryCatalogStore,
        InMemoryOrderStore,
        ChannelSender,
        D,
    >,
    pub baskets: InMemoryBasketStore,
    pub catalog: InMemoryCatalogStore,
    pub orders: InMemoryOrderStore,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub basket_id: i64,
    pub shipping_address: AddressRequest,
}

#[derive(Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl From<AddressRequest> for Address {
    fn from(req: AddressRequest) -> Self {
        Address::new(req.street, req.city, req.state, req.country, req.zip_code)
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: i64,
}

// -- Handlers --

/// POST /checkout — create an order from a basket.
#[tracing::instrument(skip(state, req), fields(basket_id = req.basket_id))]
pub async fn create<D: DeliveryIntake + 'static>(
    State(state): State<Arc<AppState<D>>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let basket_id = BasketId::new(req.basket_id);
    let shipping_address = Address::from(req.shipping_address);

    let order_id = state
        .coordinator
        .create_order(basket_id, shipping_address)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: order_id.as_i64(),
        }),
    ))
}
