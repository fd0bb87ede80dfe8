//! Broker error types.

use thiserror::Error;

/// Errors surfaced at the publish/consume boundary.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The channel's consumer side has gone away.
    #[error("channel '{channel}' is closed")]
    ChannelClosed { channel: String },

    /// The channel already has its single subscriber.
    #[error("channel '{channel}' already has a subscriber")]
    AlreadySubscribed { channel: String },
}
