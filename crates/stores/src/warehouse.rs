//! Warehouse store capability and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::StoreError;

/// Durable keyed object store for reservation records.
///
/// Writes to the same key are idempotent overwrites; that property is what
/// makes at-least-once event delivery safe to retry.
#[async_trait]
pub trait WarehouseStore: Send + Sync {
    /// Creates the backing container if it does not already exist.
    async fn ensure_container_exists(&self) -> Result<(), StoreError>;

    /// Writes the bytes under the given key, replacing any previous value.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryWarehouseState {
    container_created: bool,
    records: HashMap<String, Vec<u8>>,
    put_count: u32,
    fail_next_puts: u32,
}

/// In-memory warehouse store with failure injection for retry tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWarehouseStore {
    state: Arc<RwLock<InMemoryWarehouseState>>,
}

impl InMemoryWarehouseStore {
    /// Creates a new empty warehouse store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` put calls fail before any write happens.
    pub fn set_fail_next_puts(&self, count: u32) {
        self.state.write().unwrap().fail_next_puts = count;
    }

    /// Returns how many put calls have been attempted, including failed
    /// ones.
    pub fn put_count(&self) -> u32 {
        self.state.read().unwrap().put_count
    }

    /// Returns the number of stored records.
    pub fn record_count(&self) -> usize {
        self.state.read().unwrap().records.len()
    }

    /// Returns the bytes stored under a key.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().unwrap().records.get(key).cloned()
    }

    /// Returns true if the backing container has been created.
    pub fn container_created(&self) -> bool {
        self.state.read().unwrap().container_created
    }
}

#[async_trait]
impl WarehouseStore for InMemoryWarehouseStore {
    async fn ensure_container_exists(&self) -> Result<(), StoreError> {
        self.state.write().unwrap().container_created = true;
        Ok(())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut state = self.state.write().unwrap();
        state.put_count += 1;

        if state.fail_next_puts > 0 {
            state.fail_next_puts -= 1;
            return Err(StoreError::Unavailable(
                "warehouse write rejected".to_string(),
            ));
        }

        state.records.insert(key.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryWarehouseStore::new();
        store.ensure_container_exists().await.unwrap();
        store.put("Order - 1.json", b"{}".to_vec()).await.unwrap();

        assert!(store.container_created());
        assert_eq!(store.get("Order - 1.json"), Some(b"{}".to_vec()));
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn put_overwrites_same_key() {
        let store = InMemoryWarehouseStore::new();
        store.put("k", b"a".to_vec()).await.unwrap();
        store.put("k", b"b".to_vec()).await.unwrap();

        assert_eq!(store.record_count(), 1);
        assert_eq!(store.get("k"), Some(b"b".to_vec()));
    }

    #[tokio::test]
    async fn fail_next_puts_counts_down() {
        let store = InMemoryWarehouseStore::new();
        store.set_fail_next_puts(2);

        assert!(store.put("k", b"a".to_vec()).await.is_err());
        assert!(store.put("k", b"a".to_vec()).await.is_err());
        assert!(store.put("k", b"a".to_vec()).await.is_ok());
        assert_eq!(store.put_count(), 3);
        assert_eq!(store.record_count(), 1);
    }
}
