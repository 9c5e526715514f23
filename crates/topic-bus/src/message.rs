//! Topic identifiers and delivered messages.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Opaque identifier of a topic on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicId(Uuid);

impl TopicId {
    /// Generate a fresh topic id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message as delivered by the channel.
///
/// The consensus timestamp and sequence number are assigned by the channel
/// at publish time and are authoritative for ordering. Sequence numbers
/// start at [`crate::FIRST_SEQUENCE_NUMBER`] and increase by one per topic;
/// consensus timestamps are non-decreasing per topic.
#[derive(Debug, Clone)]
pub struct TopicMessage {
    /// Opaque payload bytes as submitted by the publisher.
    pub payload: Vec<u8>,
    /// Delivery-order timestamp assigned by the channel.
    pub consensus_timestamp: DateTime<Utc>,
    /// Position of this message on its topic.
    pub sequence_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_ids_are_unique() {
        assert_ne!(TopicId::generate(), TopicId::generate());
    }

    #[test]
    fn test_topic_id_display_is_stable() {
        let id = TopicId::generate();
        assert_eq!(id.to_string(), id.to_string());
    }
}
