//! Escalation endpoint contract and implementations.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use domain::EscalationNotice;
use reqwest::Client;

use crate::error::OutboundError;

/// Notification target invoked only when reservation persistence has
/// permanently failed.
#[async_trait]
pub trait EscalationNotifier: Send + Sync {
    /// Notifies the endpoint with the order id only. Success is a 2xx
    /// response; anything else means the order is reserved nowhere and the
    /// failure must be surfaced.
    async fn notify(&self, order_id: OrderId) -> Result<(), OutboundError>;
}

/// HTTP implementation posting `{orderId}` to a configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpEscalationNotifier {
    client: Client,
    endpoint: String,
}

impl HttpEscalationNotifier {
    /// Creates a client for the given escalation endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, OutboundError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| OutboundError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl EscalationNotifier for HttpEscalationNotifier {
    async fn notify(&self, order_id: OrderId) -> Result<(), OutboundError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EscalationNotice { order_id })
            .send()
            .await
            .map_err(|e| OutboundError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OutboundError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryEscalationState {
    notified: Vec<OrderId>,
    fail_on_notify: bool,
}

/// In-memory escalation notifier for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEscalationNotifier {
    state: Arc<RwLock<InMemoryEscalationState>>,
}

impl InMemoryEscalationNotifier {
    /// Creates a new in-memory notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the notifier to reject the next notify calls.
    pub fn set_fail_on_notify(&self, fail: bool) {
        self.state.write().unwrap().fail_on_notify = fail;
    }

    /// Returns the number of accepted notifications.
    pub fn notified_count(&self) -> usize {
        self.state.read().unwrap().notified.len()
    }

    /// Returns the order ids notified so far.
    pub fn notified(&self) -> Vec<OrderId> {
        self.state.read().unwrap().notified.clone()
    }
}

#[async_trait]
impl EscalationNotifier for InMemoryEscalationNotifier {
    async fn notify(&self, order_id: OrderId) -> Result<(), OutboundError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_notify {
            return Err(OutboundError::Status(500));
        }
        state.notified.push(order_id);
        Ok(())
    }
}
