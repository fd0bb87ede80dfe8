//! Error types for the checkout coordinator and reservation worker.

use broker::BrokerError;
use common::{BasketId, CatalogItemId, OrderId};
use domain::OrderError;
use stores::StoreError;
use thiserror::Error;

/// Errors from an outbound HTTP call to a downstream service.
#[derive(Debug, Error)]
pub enum OutboundError {
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// The request never completed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors that can occur while creating an order.
///
/// Validation failures are raised before any write; the two integration
/// variants mean the order is already persisted and carry its id.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Referenced basket does not exist.
    #[error("Basket not found: {0}")]
    BasketNotFound(BasketId),

    /// Basket has no items.
    #[error("Basket {0} is empty")]
    EmptyBasket(BasketId),

    /// A basket line references a catalog item that does not exist.
    #[error("Unknown catalog item: {0}")]
    UnknownCatalogItem(CatalogItemId),

    /// Order construction failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The order was persisted but the warehouse event could not be
    /// published. No compensating rollback is performed.
    #[error("order {order_id} persisted but warehouse publish failed: {source}")]
    PublishFailed {
        order_id: OrderId,
        #[source]
        source: BrokerError,
    },

    /// The order was persisted and the warehouse event published, but the
    /// delivery intake call failed. No compensating rollback is performed.
    #[error("order {order_id} persisted but delivery intake failed: {source}")]
    DeliveryFailed {
        order_id: OrderId,
        #[source]
        source: OutboundError,
    },
}

impl CheckoutError {
    /// Returns the persisted order id when the failure happened after the
    /// order write (partial success), `None` for pre-write failures.
    pub fn persisted_order_id(&self) -> Option<OrderId> {
        match self {
            CheckoutError::PublishFailed { order_id, .. }
            | CheckoutError::DeliveryFailed { order_id, .. } => Some(*order_id),
            _ => None,
        }
    }
}

/// Errors from one reservation worker invocation.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The reservation event could not be serialized.
    #[error("serializing reservation for order {order_id}: {source}")]
    Serialization {
        order_id: OrderId,
        #[source]
        source: serde_json::Error,
    },

    /// The warehouse store rejected the write. Absorbed by the retry stage
    /// unless every attempt fails.
    #[error("warehouse store: {0}")]
    Warehouse(#[from] StoreError),

    /// The escalation endpoint rejected the notification.
    #[error("escalation endpoint: {0}")]
    Escalation(OutboundError),

    /// Persistence exhausted all attempts and the escalation failed too:
    /// the order is reserved nowhere. The message must be treated as
    /// failed so the broker can redeliver or dead-letter it.
    #[error("order {order_id} reserved nowhere: persist failed ({persist}); escalation failed ({escalation})")]
    Fatal {
        order_id: OrderId,
        persist: String,
        escalation: String,
    },
}
