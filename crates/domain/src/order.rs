//! The `Order` aggregate built at checkout time.

use chrono::{DateTime, Utc};
use common::{BuyerId, CatalogItemId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::{Address, Money};

/// Errors raised while building an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Invalid price.
    #[error("Invalid unit price: {price} cents (must not be negative)")]
    InvalidPrice { price: i64 },

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,
}

/// Snapshot of a catalog item at order time.
///
/// Decouples order history from later catalog mutation: name and picture
/// URI are copied here and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemOrdered {
    /// The catalog item the snapshot was taken from.
    pub catalog_item_id: CatalogItemId,
    /// Product name at order time.
    pub product_name: String,
    /// Fully-qualified picture URI at order time.
    pub picture_uri: String,
}

impl CatalogItemOrdered {
    /// Creates a new catalog item snapshot.
    pub fn new(
        catalog_item_id: CatalogItemId,
        product_name: impl Into<String>,
        picture_uri: impl Into<String>,
    ) -> Self {
        Self {
            catalog_item_id,
            product_name: product_name.into(),
            picture_uri: picture_uri.into(),
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    item_ordered: CatalogItemOrdered,
    unit_price: Money,
    quantity: u32,
}

impl OrderItem {
    /// Creates a new order line.
    ///
    /// Quantity must be greater than zero and the unit price must not be
    /// negative.
    pub fn new(
        item_ordered: CatalogItemOrdered,
        unit_price: Money,
        quantity: u32,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        if unit_price.is_negative() {
            return Err(OrderError::InvalidPrice {
                price: unit_price.cents(),
            });
        }
        Ok(Self {
            item_ordered,
            unit_price,
            quantity,
        })
    }

    /// Returns the catalog item snapshot for this line.
    pub fn item_ordered(&self) -> &CatalogItemOrdered {
        &self.item_ordered
    }

    /// Returns the price per unit.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns the quantity ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the total price for this line (unit_price * quantity).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// The durable record of a completed checkout.
///
/// Built once by the coordinator from a non-empty basket; never mutated
/// afterwards. The order identifier is assigned by the Order Store and is
/// not part of the aggregate itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    buyer_id: BuyerId,
    shipping_address: Address,
    order_date: DateTime<Utc>,
    items: Vec<OrderItem>,
}

impl Order {
    /// Creates an order from a buyer, address, and at least one line.
    pub fn new(
        buyer_id: BuyerId,
        shipping_address: Address,
        items: Vec<OrderItem>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        Ok(Self {
            buyer_id,
            shipping_address,
            order_date: Utc::now(),
            items,
        })
    }

    /// Returns the buyer who placed the order.
    pub fn buyer_id(&self) -> &BuyerId {
        &self.buyer_id
    }

    /// Returns the shipping destination.
    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    /// Returns when the order was created.
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns the order lines in their original basket order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the order total: the sum of unit_price * quantity over all
    /// lines.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::total_price).sum()
    }
}
