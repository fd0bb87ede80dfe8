//! Catalog store capability and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::CatalogItemId;
use domain::CatalogItem;

use crate::error::StoreError;

/// Batch read access to catalog items.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns the catalog items matching the given IDs. IDs with no
    /// matching item are simply absent from the result.
    async fn list_by_ids(&self, ids: &[CatalogItemId]) -> Result<Vec<CatalogItem>, StoreError>;
}

/// In-memory catalog store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    items: Arc<RwLock<HashMap<CatalogItemId, CatalogItem>>>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty catalog store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a catalog item.
    pub fn insert(&self, item: CatalogItem) {
        self.items.write().unwrap().insert(item.id, item);
    }

    /// Returns the number of stored items.
    pub fn item_count(&self) -> usize {
        self.items.read().unwrap().len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_by_ids(&self, ids: &[CatalogItemId]) -> Result<Vec<CatalogItem>, StoreError> {
        let items = self.items.read().unwrap();
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }
}
