//! Delivery intake service contract and implementations.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use domain::DeliveryPayload;
use reqwest::Client;

use crate::error::OutboundError;

/// Synchronous intake endpoint for delivery processing.
///
/// Called exactly once per successful order creation attempt; deliberately
/// not wrapped in any retry policy.
#[async_trait]
pub trait DeliveryIntake: Send + Sync {
    /// Posts the payload to the intake endpoint. Success is a 2xx
    /// response; anything else is an error.
    async fn send(&self, payload: &DeliveryPayload) -> Result<(), OutboundError>;
}

/// HTTP implementation posting JSON to a configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpDeliveryIntake {
    client: Client,
    endpoint: String,
}

impl HttpDeliveryIntake {
    /// Creates a client for the given intake endpoint URL.
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
impl DeliveryIntake for HttpDeliveryIntake {
    async fn send(&self, payload: &DeliveryPayload) -> Result<(), OutboundError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
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
struct InMemoryDeliveryState {
    payloads: Vec<DeliveryPayload>,
    fail_on_send: bool,
}

/// In-memory delivery intake for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeliveryIntake {
    state: Arc<RwLock<InMemoryDeliveryState>>,
}

impl InMemoryDeliveryIntake {
    /// Creates a new in-memory intake.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the intake to reject the next send calls.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the number of accepted payloads.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().payloads.len()
    }

    /// Returns the most recently accepted payload.
    pub fn last_payload(&self) -> Option<DeliveryPayload> {
        self.state.read().unwrap().payloads.last().cloned()
    }
}

#[async_trait]
impl DeliveryIntake for InMemoryDeliveryIntake {
    async fn send(&self, payload: &DeliveryPayload) -> Result<(), OutboundError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_send {
            return Err(OutboundError::Status(503));
        }
        state.payloads.push(payload.clone());
        Ok(())
    }
}
