//! # In-Memory Topic Bus
//!
//! In-memory implementation of the topic channel.
//!
//! Uses a per-topic retained log plus `tokio::sync::broadcast` fan-out.
//! Suitable for single-process operation; a remote ledger network adapter
//! would implement the same [`TopicChannel`] trait.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;

use crate::channel::TopicChannel;
use crate::errors::ChannelError;
use crate::message::{TopicId, TopicMessage};
use crate::subscriber::TopicSubscription;
use crate::{DEFAULT_CHANNEL_CAPACITY, FIRST_SEQUENCE_NUMBER};

/// Per-topic state: retained log, live fan-out, stamping cursor.
struct TopicState {
    /// Retained messages in consensus order.
    log: Vec<TopicMessage>,
    /// Live broadcast sender for this topic.
    sender: broadcast::Sender<TopicMessage>,
    /// Sequence number the next publish will be assigned.
    next_sequence: u64,
    /// Consensus timestamp of the latest publish, for monotonicity.
    last_timestamp: DateTime<Utc>,
}

impl TopicState {
    fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            log: Vec::new(),
            sender,
            next_sequence: FIRST_SEQUENCE_NUMBER,
            last_timestamp: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// In-memory implementation of the topic channel.
pub struct InMemoryTopicBus {
    /// Topic states by id.
    topics: RwLock<HashMap<TopicId, TopicState>>,

    /// Active subscription count by topic.
    subscriptions: Arc<RwLock<HashMap<TopicId, usize>>>,

    /// Total messages published across all topics.
    messages_published: AtomicU64,

    /// Broadcast channel capacity per topic.
    capacity: usize,
}

impl InMemoryTopicBus {
    /// Create a new in-memory topic bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory topic bus with specified per-topic capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Get the number of topics on the bus.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Get the number of active subscriptions for a topic.
    #[must_use]
    pub fn subscriber_count(&self, topic: TopicId) -> usize {
        self.subscriptions
            .read()
            .ok()
            .and_then(|subs| subs.get(&topic).copied())
            .unwrap_or(0)
    }

    /// Get the total number of messages published.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryTopicBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TopicChannel for InMemoryTopicBus {
    async fn create_topic(&self) -> Result<TopicId, ChannelError> {
        let id = TopicId::generate();
        let mut topics = self.topics.write().map_err(|_| ChannelError::Closed)?;
        topics.insert(id, TopicState::new(self.capacity));
        debug!(topic = %id, "Topic created");
        Ok(id)
    }

    async fn publish(&self, topic: TopicId, payload: Vec<u8>) -> Result<u64, ChannelError> {
        let mut topics = self.topics.write().map_err(|_| ChannelError::Closed)?;
        let state = topics
            .get_mut(&topic)
            .ok_or(ChannelError::TopicNotFound(topic))?;

        // Stamp under the topic lock so sequence order and timestamp order
        // agree. Wall-clock time can step backwards; clamp to the previous
        // stamp to keep consensus timestamps non-decreasing.
        let timestamp = Utc::now().max(state.last_timestamp);
        let message = TopicMessage {
            payload,
            consensus_timestamp: timestamp,
            sequence_number: state.next_sequence,
        };
        state.next_sequence += 1;
        state.last_timestamp = timestamp;
        state.log.push(message.clone());

        // A send error only means no live subscribers; the log retains the
        // message for later subscriptions.
        let _ = state.sender.send(message);

        self.messages_published.fetch_add(1, Ordering::Relaxed);
        debug!(topic = %topic, seq = state.next_sequence - 1, "Message published");
        Ok(state.next_sequence - 1)
    }

    async fn subscribe(
        &self,
        topic: TopicId,
        from_sequence: u64,
    ) -> Result<TopicSubscription, ChannelError> {
        // A read lock excludes publishers (they take write), so the backlog
        // snapshot and the broadcast receiver cover the log with no gap.
        let topics = self.topics.read().map_err(|_| ChannelError::Closed)?;
        let state = topics
            .get(&topic)
            .ok_or(ChannelError::TopicNotFound(topic))?;

        let from = from_sequence.max(FIRST_SEQUENCE_NUMBER);
        let backlog: VecDeque<TopicMessage> = state
            .log
            .iter()
            .filter(|m| m.sequence_number >= from)
            .cloned()
            .collect();
        let receiver = state.sender.subscribe();

        // Track subscription
        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(topic).or_insert(0) += 1;
            }
        }

        debug!(topic = %topic, from = from, backlog = backlog.len(), "New subscription created");

        Ok(TopicSubscription::new(
            backlog,
            receiver,
            from,
            self.subscriptions.clone(),
            topic,
        ))
    }

    async fn await_ready(&self, topic: TopicId) -> Result<(), ChannelError> {
        // The bus is consistent by construction; readiness is immediate.
        let topics = self.topics.read().map_err(|_| ChannelError::Closed)?;
        if topics.contains_key(&topic) {
            Ok(())
        } else {
            Err(ChannelError::TopicNotFound(topic))
        }
    }
}
