//! Basket read model consumed at checkout time.

use common::{BasketId, BuyerId, CatalogItemId};
use serde::{Deserialize, Serialize};

use crate::value_objects::Money;

/// One line of a shopper's basket.
///
/// Unit price and quantity are snapshotted here when the line is added;
/// checkout copies them verbatim rather than re-pricing from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    /// The catalog item this line refers to.
    pub catalog_item_id: CatalogItemId,
    /// Price per unit at the time the line was added.
    pub unit_price: Money,
    /// Quantity selected.
    pub quantity: u32,
}

impl BasketItem {
    /// Creates a new basket line.
    pub fn new(catalog_item_id: CatalogItemId, unit_price: Money, quantity: u32) -> Self {
        Self {
            catalog_item_id,
            unit_price,
            quantity,
        }
    }
}

/// A shopper's in-progress selection prior to order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    /// Basket identifier.
    pub id: BasketId,
    /// The buyer who owns the basket.
    pub buyer_id: BuyerId,
    /// Basket lines in the order they were added.
    pub items: Vec<BasketItem>,
}

impl Basket {
    /// Creates a basket with the given lines.
    pub fn new(id: BasketId, buyer_id: BuyerId, items: Vec<BasketItem>) -> Self {
        Self {
            id,
            buyer_id,
            items,
        }
    }

    /// Returns true if the basket has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the distinct catalog item IDs referenced by the basket lines.
    pub fn catalog_item_ids(&self) -> Vec<CatalogItemId> {
        let mut ids: Vec<CatalogItemId> =
            self.items.iter().map(|line| line.catalog_item_id).collect();
        ids.dedup();
        ids
    }
}
