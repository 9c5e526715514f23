//! Console delivery sink.

use delivery_pipeline::{DeliveryRecord, DeliverySink};

/// Line-oriented operator output: `N. "text" at YYYY-MM-DD HH:MM:SS`.
///
/// Sent and received records go to stdout; diagnostics stay on the
/// tracing subscriber.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Create a new console sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DeliverySink for ConsoleSink {
    fn message_sent(&self, record: &DeliveryRecord) {
        println!(
            "{}. \"{}\" at {} (sent)",
            record.index, record.text, record.timestamp
        );
    }

    fn message_received(&self, record: &DeliveryRecord) {
        println!(
            "{}. \"{}\" at {}",
            record.index, record.text, record.timestamp
        );
    }
}
