//! Order domain model for the checkout pipeline.
//!
//! This crate provides the basket and catalog read models, the `Order`
//! aggregate built at checkout time, and the wire contracts published to
//! the warehouse pipeline and the delivery intake service.

pub mod basket;
pub mod catalog;
pub mod messages;
pub mod order;
pub mod value_objects;

pub use basket::{Basket, BasketItem};
pub use catalog::{CatalogItem, UriComposer};
pub use messages::{DeliveryPayload, EscalationNotice, ReservedItem, WarehouseReservationEvent};
pub use order::{CatalogItemOrdered, Order, OrderError, OrderItem};
pub use value_objects::{Address, Money};
