//! Task handles: capabilities over already-started computations

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;

use crate::error::{settle_joined, TaskError};
use crate::outcome::SharedOutcome;
use crate::BoxFuture;

/// A handle to exactly one in-flight asynchronous computation.
///
/// The pipeline's concurrency bound only means anything if the computation
/// behind each handle is already running by the time the handle is pulled
/// from the source: pulling the Nth handle is what starts the Nth
/// computation. `TaskHandle` makes that contract structural — every
/// constructor takes a computation that is already running on the tokio
/// runtime, so a source of handles cannot accidentally serialize execution.
///
/// A handle is consumed exactly once by [`outcome`](TaskHandle::outcome).
pub struct TaskHandle<T, E> {
    inner: BoxFuture<Result<T, TaskError<E>>>,
}

impl<T, E> TaskHandle<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Spawn the computation onto the runtime and wrap the running task.
    pub fn spawn<F>(computation: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::from_task(tokio::spawn(computation))
    }

    /// Wrap a task that is already running.
    pub fn from_task(task: JoinHandle<Result<T, E>>) -> Self {
        Self {
            inner: Box::pin(async move { settle_joined(task.await) }),
        }
    }

    /// Await the computation's settlement, consuming the handle.
    ///
    /// A panic or abort of the underlying task surfaces as
    /// [`TaskError::Panicked`] rather than escaping unobserved.
    pub async fn outcome(self) -> Result<T, TaskError<E>> {
        self.inner.await
    }
}

impl<T, E> TaskHandle<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Derive a handle from a [`SharedOutcome`], replaying its settlement.
    pub fn from_shared(shared: &SharedOutcome<T, E>) -> Self {
        let shared = shared.clone();
        Self {
            inner: Box::pin(async move { shared.outcome().await }),
        }
    }
}

impl<T, E> fmt::Debug for TaskHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawned_handle_resolves() {
        let handle: TaskHandle<i32, String> = TaskHandle::spawn(async { Ok(21 * 2) });
        assert_eq!(handle.outcome().await, Ok(42));
    }

    #[tokio::test]
    async fn test_spawned_handle_surfaces_failure_payload() {
        let handle: TaskHandle<i32, String> =
            TaskHandle::spawn(async { Err("negative value not allowed".to_string()) });
        assert_eq!(
            handle.outcome().await,
            Err(TaskError::Failed("negative value not allowed".to_string()))
        );
    }

    #[tokio::test]
    async fn test_from_task_wraps_running_computation() {
        let task = tokio::spawn(async { Ok::<_, String>(7) });
        let handle = TaskHandle::from_task(task);
        assert_eq!(handle.outcome().await, Ok(7));
    }

    #[tokio::test]
    async fn test_panicked_task_becomes_an_error() {
        let handle: TaskHandle<i32, String> = TaskHandle::spawn(async { panic!("kaboom") });
        let outcome = handle.outcome().await;
        assert!(matches!(outcome, Err(TaskError::Panicked(_))));
    }

    #[tokio::test]
    async fn test_aborted_task_becomes_an_error() {
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok::<_, String>(1)
        });
        task.abort();
        let handle = TaskHandle::from_task(task);
        assert!(matches!(handle.outcome().await, Err(TaskError::Panicked(_))));
    }
}
