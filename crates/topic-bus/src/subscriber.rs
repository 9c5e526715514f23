//! # Topic Subscriber
//!
//! Defines the subscription side of the topic channel.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use crate::message::{TopicId, TopicMessage};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The topic channel was closed.
    #[error("Topic channel closed")]
    Closed,
}

/// A subscription handle for receiving topic messages in consensus order.
///
/// Replays the retained log (from the requested sequence number) before
/// switching to live deliveries, deduplicating the boundary by sequence
/// number. When dropped, the subscription is automatically released.
pub struct TopicSubscription {
    /// Retained messages captured at subscribe time, already filtered to
    /// `sequence_number >= from_sequence`.
    backlog: VecDeque<TopicMessage>,

    /// The live broadcast receiver.
    receiver: broadcast::Receiver<TopicMessage>,

    /// Next sequence number this subscription expects to deliver.
    next_sequence: u64,

    /// Reference to subscription tracking (for cleanup).
    subscriptions: Arc<RwLock<HashMap<TopicId, usize>>>,

    /// Topic this subscription is attached to.
    topic: TopicId,
}

impl TopicSubscription {
    /// Create a new subscription.
    pub(crate) fn new(
        backlog: VecDeque<TopicMessage>,
        receiver: broadcast::Receiver<TopicMessage>,
        next_sequence: u64,
        subscriptions: Arc<RwLock<HashMap<TopicId, usize>>>,
        topic: TopicId,
    ) -> Self {
        Self {
            backlog,
            receiver,
            next_sequence,
            subscriptions,
            topic,
        }
    }

    /// Receive the next message in consensus order.
    ///
    /// # Returns
    ///
    /// - `Some(message)` - The next message
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<TopicMessage> {
        if let Some(message) = self.backlog.pop_front() {
            self.next_sequence = message.sequence_number + 1;
            return Some(message);
        }

        loop {
            let message = match self.receiver.recv().await {
                Ok(m) => m,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some messages dropped");
                    continue;
                }
            };

            // Live copy of a message already delivered from the backlog
            if message.sequence_number < self.next_sequence {
                continue;
            }

            self.next_sequence = message.sequence_number + 1;
            return Some(message);
        }
    }

    /// Try to receive the next message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was available
    /// - `Ok(None)` - No message available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<TopicMessage>, SubscriptionError> {
        if let Some(message) = self.backlog.pop_front() {
            self.next_sequence = message.sequence_number + 1;
            return Ok(Some(message));
        }

        loop {
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if message.sequence_number < self.next_sequence {
                continue;
            }

            self.next_sequence = message.sequence_number + 1;
            return Ok(Some(message));
        }
    }

    /// Get the topic this subscription is attached to.
    #[must_use]
    pub fn topic(&self) -> TopicId {
        self.topic
    }
}

impl Drop for TopicSubscription {
    fn drop(&mut self) {
        // Decrement subscription count
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(&self.topic) else {
            debug!(topic = %self.topic, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(&self.topic);
        }
        debug!(topic = %self.topic, "Subscription dropped");
    }
}
