//! Shared identifier types for the checkout pipeline.

pub mod types;

pub use types::{BasketId, BuyerId, CatalogItemId, MessageId, OrderId};
