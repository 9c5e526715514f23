//! Pipeline lifecycle state machine.

/// Lifecycle phase of a pipeline run.
///
/// ```text
/// Idle → Subscribed → Running → Complete
///            │           │
///            └───────────┴────→ Failed
/// ```
///
/// `Subscribed` is entered before any publish; this ordering is a hard
/// precondition, not an optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// No channel resources held yet.
    Idle,
    /// Subscription established; publishing has not started.
    Subscribed,
    /// Publishing and receiving interleaved.
    Running,
    /// All expected messages received; channel released.
    Complete,
    /// A channel-level error terminated the run; channel released.
    Failed,
}

impl PipelinePhase {
    /// Whether a transition to `next` is legal from this phase.
    #[must_use]
    pub fn can_transition(self, next: PipelinePhase) -> bool {
        use PipelinePhase::{Complete, Failed, Idle, Running, Subscribed};
        matches!(
            (self, next),
            (Idle, Subscribed)
                | (Idle, Failed)
                | (Subscribed, Running)
                | (Subscribed, Failed)
                | (Running, Complete)
                | (Running, Failed)
        )
    }

    /// Whether this phase is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelinePhase::Complete | PipelinePhase::Failed)
    }
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelinePhase::Idle => "idle",
            PipelinePhase::Subscribed => "subscribed",
            PipelinePhase::Running => "running",
            PipelinePhase::Complete => "complete",
            PipelinePhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
