//! The topic channel port.

use async_trait::async_trait;

use crate::errors::ChannelError;
use crate::message::TopicId;
use crate::subscriber::TopicSubscription;

/// Interface to an external consensus-ordered pub/sub channel.
///
/// Durability, ordering, and consensus guarantees are owned by the channel
/// implementation; consumers treat delivered order within a subscription as
/// authoritative and do not reorder.
#[async_trait]
pub trait TopicChannel: Send + Sync {
    /// Create a new topic and return its id.
    async fn create_topic(&self) -> Result<TopicId, ChannelError>;

    /// Publish a payload to a topic.
    ///
    /// Returns the sequence number the channel assigned to the message.
    async fn publish(&self, topic: TopicId, payload: Vec<u8>) -> Result<u64, ChannelError>;

    /// Subscribe to a topic from a given sequence number.
    ///
    /// `from_sequence` of 0 or 1 means "from the beginning of the topic's
    /// life". The subscription replays retained messages first, then
    /// continues with live deliveries, in consensus order.
    async fn subscribe(
        &self,
        topic: TopicId,
        from_sequence: u64,
    ) -> Result<TopicSubscription, ChannelError>;

    /// Wait until the topic is consistent and subscriptions will observe
    /// subsequent publishes.
    ///
    /// Implementations that can observe readiness return as soon as the
    /// topic is consistent; implementations that cannot (a remote ledger
    /// with unobservable mirror propagation) sleep a fixed fallback delay
    /// they were configured with.
    async fn await_ready(&self, topic: TopicId) -> Result<(), ChannelError>;
}
