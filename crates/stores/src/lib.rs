//! Capability traits for the external stores the checkout pipeline talks
//! to, with in-memory implementations.
//!
//! Each store is a minimal interface: one implementation in production,
//! the in-memory one in tests. The in-memory stores double as test spies
//! with invocation counters and failure injection.

pub mod basket;
pub mod catalog;
pub mod error;
pub mod order;
pub mod warehouse;

pub use basket::{BasketStore, InMemoryBasketStore};
pub use catalog::{CatalogStore, InMemoryCatalogStore};
pub use error::StoreError;
pub use order::{InMemoryOrderStore, OrderStore};
pub use warehouse::{InMemoryWarehouseStore, WarehouseStore};
