//! Diagnostic reporting for pipeline failures
//!
//! The pipeline surfaces exactly one failure to its consumer: the first one.
//! Everything else discovered while settling the remaining window — the
//! secondary failures — is handed to a [`PipelineReporter`] so the
//! information reaches diagnostics without ever reaching the consumer.

use tracing::{error, warn};

/// Event types reported while a pipeline run is failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The failure that is about to be surfaced to the consumer
    TriggeringFailure { error: String },
    /// An additional failure settled during the drain barrier; logged, never
    /// propagated
    SecondaryFailure { error: String },
}

/// Trait for receiving pipeline diagnostic events
///
/// The default reporter logs through `tracing`; tests and embedding
/// applications can substitute their own sink.
pub trait PipelineReporter: Send {
    /// Report a diagnostic event
    fn report_event(&mut self, event: PipelineEvent);

    /// Called once the failing run has finished settling its window
    fn finish(&mut self) {
        // Default implementation does nothing
    }
}

/// Reporter that forwards events to the `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingReporter;

impl PipelineReporter for TracingReporter {
    fn report_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::TriggeringFailure { error: failure } => {
                error!(error = %failure, "pipeline task failed, surfacing error to consumer");
            }
            PipelineEvent::SecondaryFailure { error: failure } => {
                warn!(error = %failure, "additional task failure settled during drain, not surfacing");
            }
        }
    }
}

/// Reporter that discards all events
#[derive(Debug, Default)]
pub struct NoOpReporter;

impl PipelineReporter for NoOpReporter {
    fn report_event(&mut self, _event: PipelineEvent) {
        // Do nothing
    }
}
