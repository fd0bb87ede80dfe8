//! Basket store capability and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::BasketId;
use domain::Basket;

use crate::error::StoreError;

/// Read access to shoppers' baskets.
#[async_trait]
pub trait BasketStore: Send + Sync {
    /// Loads a basket with its lines. Returns `None` if no basket exists
    /// with the given ID.
    async fn get_by_id_with_items(
        &self,
        basket_id: BasketId,
    ) -> Result<Option<Basket>, StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryBasketState {
    baskets: HashMap<BasketId, Basket>,
    get_count: u32,
}

/// In-memory basket store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBasketStore {
    state: Arc<RwLock<InMemoryBasketState>>,
}

impl InMemoryBasketStore {
    /// Creates a new empty basket store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a basket.
    pub fn insert(&self, basket: Basket) {
        self.state.write().unwrap().baskets.insert(basket.id, basket);
    }

    /// Returns how many lookups have been performed.
    pub fn get_count(&self) -> u32 {
        self.state.read().unwrap().get_count
    }
}

#[async_trait]
impl BasketStore for InMemoryBasketStore {
    async fn get_by_id_with_items(
        &self,
        basket_id: BasketId,
    ) -> Result<Option<Basket>, StoreError> {
        let mut state = self.state.write().unwrap();
        state.get_count += 1;
        Ok(state.baskets.get(&basket_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{BuyerId, CatalogItemId};
    use domain::{BasketItem, Money};

    #[tokio::test]
    async fn get_missing_basket_returns_none() {
        let store = InMemoryBasketStore::new();
        let result = store
            .get_by_id_with_items(BasketId::new(1))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.get_count(), 1);
    }

    #[tokio::test]
    async fn insert_and_get_basket() {
        let store = InMemoryBasketStore::new();
        let basket = Basket::new(
            BasketId::new(1),
            BuyerId::new("buyer"),
            vec![BasketItem::new(
                CatalogItemId::new(7),
                Money::from_cents(1000),
                2,
            )],
        );
        store.insert(basket.clone());

        let loaded = store
            .get_by_id_with_items(BasketId::new(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, basket);
    }
}
