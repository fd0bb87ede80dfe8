//! Order store capability and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::Order;

use crate::error::StoreError;

/// Durable persistence for order aggregates.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the order and returns its assigned identifier.
    async fn add(&self, order: Order) -> Result<OrderId, StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, Order>,
    next_id: i64,
    fail_on_add: bool,
}

/// In-memory order store assigning sequential identifiers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail on the next add call.
    pub fn set_fail_on_add(&self, fail: bool) {
        self.state.write().unwrap().fail_on_add = fail;
    }

    /// Returns the number of persisted orders.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }

    /// Returns a persisted order by ID.
    pub fn get(&self, order_id: OrderId) -> Option<Order> {
        self.state.read().unwrap().orders.get(&order_id).cloned()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn add(&self, order: Order) -> Result<OrderId, StoreError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_add {
            return Err(StoreError::Unavailable("order write rejected".to_string()));
        }

        state.next_id += 1;
        let order_id = OrderId::new(state.next_id);
        state.orders.insert(order_id, order);

        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{BuyerId, CatalogItemId};
    use domain::{Address, CatalogItemOrdered, Money, OrderItem};

    fn order() -> Order {
        let item = OrderItem::new(
            CatalogItemOrdered::new(CatalogItemId::new(1), "Widget", "/pics/1.png"),
            Money::from_cents(1000),
            1,
        )
        .unwrap();
        Order::new(
            BuyerId::new("buyer"),
            Address::new("1 Main St", "Springfield", "IL", "US", "62704"),
            vec![item],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn add_assigns_sequential_ids() {
        let store = InMemoryOrderStore::new();

        let id1 = store.add(order()).await.unwrap();
        let id2 = store.add(order()).await.unwrap();

        assert_eq!(id1, OrderId::new(1));
        assert_eq!(id2, OrderId::new(2));
        assert_eq!(store.order_count(), 2);
    }

    #[tokio::test]
    async fn add_failure_persists_nothing() {
        let store = InMemoryOrderStore::new();
        store.set_fail_on_add(true);

        let result = store.add(order()).await;
        assert!(result.is_err());
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn get_returns_persisted_order() {
        let store = InMemoryOrderStore::new();
        let stored = order();
        let id = store.add(stored.clone()).await.unwrap();

        assert_eq!(store.get(id), Some(stored));
        assert_eq!(store.get(OrderId::new(99)), None);
    }
}
