//! Channel error types.

use thiserror::Error;

use crate::message::TopicId;

/// Errors from topic channel operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The topic does not exist on this channel.
    #[error("Topic not found: {0}")]
    TopicNotFound(TopicId),

    /// The channel was closed.
    #[error("Channel closed")]
    Closed,

    /// A publish was rejected by the channel.
    #[error("Publish failed: {0}")]
    PublishFailed(String),
}
