//! Error types for the conveyor pipeline

use thiserror::Error;
use tokio::task::JoinError;

/// Errors related to pipeline configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid parallelism: {value} (must be at least 2; use `serial` for unbuffered execution)")]
    InvalidParallelism { value: usize },
}

/// Outcome-side errors surfaced when a task handle is settled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    /// The wrapped computation failed. Carries the computation's own error
    /// payload unmodified.
    #[error("task failed: {0:?}")]
    Failed(E),

    /// The underlying tokio task panicked or was aborted before it could
    /// settle. Carries the join error's message.
    #[error("task panicked before settling: {0}")]
    Panicked(String),

    /// The settlement record was lost before anyone observed it. This is a
    /// defensive condition that indicates a bug in the bookkeeping, not a
    /// normal user-facing state.
    #[error("task settlement was lost before it was observed")]
    Unsettled,
}

/// Umbrella error for callers combining construction and consumption
#[derive(Error, Debug)]
pub enum ConveyorError<E> {
    #[error("configuration error")]
    Config(ConfigError),

    #[error("task error")]
    Task(TaskError<E>),
}

impl<E> From<ConfigError> for ConveyorError<E> {
    fn from(error: ConfigError) -> Self {
        ConveyorError::Config(error)
    }
}

impl<E> From<TaskError<E>> for ConveyorError<E> {
    fn from(error: TaskError<E>) -> Self {
        ConveyorError::Task(error)
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create an invalid parallelism error
    pub fn invalid_parallelism(value: usize) -> Self {
        ConfigError::InvalidParallelism { value }
    }
}

impl<E> TaskError<E> {
    /// Create a task failure carrying the computation's error payload
    pub fn failed(payload: E) -> Self {
        TaskError::Failed(payload)
    }

    /// Check if this error carries a task's own failure payload
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskError::Failed(_))
    }

    /// Check if this error came from a panicked or aborted task
    pub fn is_panic(&self) -> bool {
        matches!(self, TaskError::Panicked(_))
    }

    /// Borrow the failure payload, if any
    pub fn payload(&self) -> Option<&E> {
        match self {
            TaskError::Failed(payload) => Some(payload),
            _ => None,
        }
    }

    /// Take the failure payload, if any
    pub fn into_payload(self) -> Option<E> {
        match self {
            TaskError::Failed(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Map a joined tokio task into a settled outcome.
///
/// A `JoinError` means the task never produced a value: it panicked or was
/// aborted. Both collapse into [`TaskError::Panicked`] so the failure still
/// surfaces at the point where the task's result would have been used.
pub(crate) fn settle_joined<T, E>(joined: Result<Result<T, E>, JoinError>) -> Result<T, TaskError<E>> {
    match joined {
        Ok(result) => result.map_err(TaskError::Failed),
        Err(join_error) => Err(TaskError::Panicked(join_error.to_string())),
    }
}
