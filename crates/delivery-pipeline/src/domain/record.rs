//! Operator-visible delivery records.

use chrono::{DateTime, Utc};
use topic_bus::TopicId;

/// One operator-visible sent or received message record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    /// 1-based position: send index on the publish path, accepted-message
    /// counter on the receive path.
    pub index: usize,
    /// The literal message text (pre-encoding on send, post-decode on
    /// receive).
    pub text: String,
    /// Formatted timestamp: local send time or consensus timestamp.
    pub timestamp: String,
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Topic the run used.
    pub topic: TopicId,
    /// Messages published.
    pub sent: usize,
    /// Messages accepted on the receive path.
    pub received: usize,
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}
