//! Error types for the delivery pipeline.

use shared_envelope::EnvelopeError;
use thiserror::Error;
use topic_bus::ChannelError;

use crate::domain::PipelinePhase;

/// Delivery pipeline errors.
///
/// All variants are fatal to the run; the pipeline does not retry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Topic creation failed.
    #[error("Topic creation failed: {0}")]
    CreateTopic(#[source] ChannelError),

    /// Subscription could not be established.
    #[error("Subscription failed: {0}")]
    Subscribe(#[source] ChannelError),

    /// The channel never became ready for the topic.
    #[error("Channel readiness failed: {0}")]
    Readiness(#[source] ChannelError),

    /// Envelope encoding failed on the publish path.
    #[error("Envelope encoding failed: {0}")]
    Encode(#[source] EnvelopeError),

    /// A publish failed; the remaining publish loop is aborted.
    #[error("Publish of message {index} failed: {source}")]
    Publish {
        /// 0-based index of the failed message.
        index: usize,
        /// The underlying channel error.
        #[source]
        source: ChannelError,
    },

    /// The channel closed before all expected messages were received.
    #[error("Channel closed after {received} of {expected} expected messages")]
    ChannelClosed {
        /// Messages accepted before closure.
        received: usize,
        /// Messages the run was waiting for.
        expected: usize,
    },

    /// An illegal lifecycle transition was attempted.
    #[error("Invalid pipeline transition: {from} -> {to}")]
    InvalidTransition {
        /// Phase the pipeline was in.
        from: PipelinePhase,
        /// Phase that was requested.
        to: PipelinePhase,
    },
}
