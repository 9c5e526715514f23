//! Pipeline configuration.

use std::time::Duration;

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Messages to publish, in order.
    pub messages: Vec<String>,
    /// Substring filter for inbound messages; empty accepts everything.
    pub filter_keyword: String,
    /// Inter-message delay on the publish path.
    ///
    /// A deliberate throttle against the channel's ordering guarantees,
    /// not a correctness requirement.
    pub send_delay: Duration,
}

impl PipelineConfig {
    /// Number of accepted inbound messages that completes the run.
    #[must_use]
    pub fn expected_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            filter_keyword: String::new(),
            send_delay: Duration::from_secs(1),
        }
    }
}
