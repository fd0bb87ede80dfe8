//! In-memory channel broker backed by tokio mpsc queues.
//!
//! Messages buffer per channel until the single subscriber drains them,
//! which matches the queue semantics the pipeline relies on: a publish
//! succeeds as long as the channel exists, independent of whether the
//! consumer is currently running.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::MessageId;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::BrokerError;
use crate::{Delivery, Publisher};

struct ChannelState {
    tx: mpsc::UnboundedSender<Delivery>,
    rx: Option<mpsc::UnboundedReceiver<Delivery>>,
}

impl ChannelState {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Some(rx) }
    }
}

/// In-process message broker with one queue per named channel.
#[derive(Clone, Default)]
pub struct ChannelBroker {
    channels: Arc<Mutex<HashMap<String, ChannelState>>>,
}

impl ChannelBroker {
    /// Creates a new broker with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a message body to the named channel, creating the channel
    /// on first use.
    pub fn publish(&self, channel: &str, body: Vec<u8>) -> Result<(), BrokerError> {
        let mut channels = self.channels.lock().unwrap();
        let state = channels
            .entry(channel.to_string())
            .or_insert_with(ChannelState::new);

        let delivery = Delivery {
            message_id: MessageId::new(),
            body,
        };
        debug!(message_id = %delivery.message_id, channel, "publishing message");

        state
            .tx
            .send(delivery)
            .map_err(|_| BrokerError::ChannelClosed {
                channel: channel.to_string(),
            })
    }

    /// Takes the consumer side of the named channel.
    ///
    /// Each channel supports a single subscriber; messages published before
    /// the subscription are delivered once the subscriber starts draining.
    pub fn subscribe(&self, channel: &str) -> Result<Subscription, BrokerError> {
        let mut channels = self.channels.lock().unwrap();
        let state = channels
            .entry(channel.to_string())
            .or_insert_with(ChannelState::new);

        match state.rx.take() {
            Some(rx) => Ok(Subscription { rx }),
            None => Err(BrokerError::AlreadySubscribed {
                channel: channel.to_string(),
            }),
        }
    }

    /// Returns a publisher bound to the named channel.
    pub fn sender(&self, channel: impl Into<String>) -> ChannelSender {
        ChannelSender {
            broker: self.clone(),
            channel: channel.into(),
        }
    }
}

/// The consumer side of one broker channel.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Delivery>,
}

impl Subscription {
    /// Receives the next delivery. Returns `None` once every publisher for
    /// the channel has gone away and the queue is drained.
    pub async fn recv(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }

    /// Receives a delivery if one is already queued.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        self.rx.try_recv().ok()
    }
}

/// A publisher bound to a single channel of a [`ChannelBroker`].
#[derive(Clone)]
pub struct ChannelSender {
    broker: ChannelBroker,
    channel: String,
}

impl ChannelSender {
    /// Returns the channel this sender publishes to.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[async_trait]
impl Publisher for ChannelSender {
    async fn publish(&self, body: Vec<u8>) -> Result<(), BrokerError> {
        self.broker.publish(&self.channel, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_buffers_until_subscribe() {
        let broker = ChannelBroker::new();
        broker.publish("orders", b"one".to_vec()).unwrap();
        broker.publish("orders", b"two".to_vec()).unwrap();

        let mut sub = broker.subscribe("orders").unwrap();
        assert_eq!(sub.recv().await.unwrap().body, b"one");
        assert_eq!(sub.recv().await.unwrap().body, b"two");
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn second_subscriber_is_rejected() {
        let broker = ChannelBroker::new();
        let _sub = broker.subscribe("orders").unwrap();

        let result = broker.subscribe("orders");
        assert!(matches!(
            result,
            Err(BrokerError::AlreadySubscribed { .. })
        ));
    }

    #[tokio::test]
    async fn publish_after_subscriber_drop_fails() {
        let broker = ChannelBroker::new();
        let sub = broker.subscribe("orders").unwrap();
        drop(sub);

        let result = broker.publish("orders", b"late".to_vec());
        assert!(matches!(result, Err(BrokerError::ChannelClosed { .. })));
    }

    #[tokio::test]
    async fn channels_are_independent() {
        let broker = ChannelBroker::new();
        broker.publish("a", b"for-a".to_vec()).unwrap();
        broker.publish("b", b"for-b".to_vec()).unwrap();

        let mut sub_b = broker.subscribe("b").unwrap();
        assert_eq!(sub_b.recv().await.unwrap().body, b"for-b");
        assert!(sub_b.try_recv().is_none());
    }

    #[tokio::test]
    async fn sender_publishes_to_bound_channel() {
        let broker = ChannelBroker::new();
        let sender = broker.sender("orders");
        sender.publish(b"body".to_vec()).await.unwrap();

        let mut sub = broker.subscribe("orders").unwrap();
        let delivery = sub.recv().await.unwrap();
        assert_eq!(delivery.body, b"body");
    }

    #[tokio::test]
    async fn deliveries_get_distinct_message_ids() {
        let broker = ChannelBroker::new();
        broker.publish("orders", b"one".to_vec()).unwrap();
        broker.publish("orders", b"two".to_vec()).unwrap();

        let mut sub = broker.subscribe("orders").unwrap();
        let first = sub.recv().await.unwrap();
        let second = sub.recv().await.unwrap();
        assert_ne!(first.message_id, second.message_id);
    }
}
