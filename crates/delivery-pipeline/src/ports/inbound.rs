//! Inbound ports (API) for the delivery pipeline.

use async_trait::async_trait;

use crate::domain::{PipelinePhase, PipelineReport};
use crate::events::PipelineError;

/// Primary API for driving a pipeline run.
#[async_trait]
pub trait MessagingPipeline: Send + Sync {
    /// Run the full choreography: create topic, subscribe, publish the
    /// configured messages, and consume until all expected messages are
    /// accepted.
    ///
    /// # Errors
    ///
    /// Any `PipelineError` is fatal to the run; the channel subscription is
    /// released on both the completion and the error path.
    async fn run(&self) -> Result<PipelineReport, PipelineError>;

    /// Current lifecycle phase.
    fn phase(&self) -> PipelinePhase;
}
