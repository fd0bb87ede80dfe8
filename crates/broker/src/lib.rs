//! Message broker contract for the checkout pipeline.
//!
//! The pipeline only specifies the publish/consume boundary: messages are
//! opaque serialized bodies on a named channel, delivered at-least-once
//! with no ordering guarantee across channels. [`channel::ChannelBroker`]
//! provides an in-process implementation backed by tokio channels.

pub mod channel;
pub mod error;

use async_trait::async_trait;
use common::MessageId;

pub use channel::{ChannelBroker, ChannelSender, Subscription};
pub use error::BrokerError;

/// A message as handed to a consumer.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Broker-assigned identifier, for log correlation only.
    pub message_id: MessageId,
    /// Serialized message body.
    pub body: Vec<u8>,
}

/// Publish access to a single broker channel.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes a message body to the channel this publisher is bound to.
    async fn publish(&self, body: Vec<u8>) -> Result<(), BrokerError>;
}
