//! Deferred-rejection wrapper: capture a settlement once, replay it many times
//!
//! Use [`SharedOutcome`] when a running computation is created in one place
//! but consumed later, possibly by several observers. The wrapper attaches to
//! the task at construction time, so the settlement — value or failure — is
//! recorded even if nobody is awaiting it yet, and every later call to
//! [`outcome`](SharedOutcome::outcome) replays that single settlement.
//!
//! This is not a mechanism for silently ignoring failures: an unconsumed
//! failure is still held in the record, and any observer that does look gets
//! the original error payload back unmodified.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{settle_joined, TaskError};

/// Wraps an already-started computation, capturing its single settlement.
///
/// The outcome record is written at most once (when the task settles) and
/// read any number of times. Cloning the wrapper is cheap; all clones observe
/// the same record.
#[derive(Debug, Clone)]
pub struct SharedOutcome<T, E> {
    record: watch::Receiver<Option<Result<T, TaskError<E>>>>,
}

impl<T, E> SharedOutcome<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Attach to a running task and start capturing its settlement.
    ///
    /// The observer is installed synchronously, before this constructor
    /// returns, so there is no window in which the task could settle without
    /// the record being written.
    pub fn new(task: JoinHandle<Result<T, E>>) -> Self {
        let (writer, record) = watch::channel(None);
        tokio::spawn(async move {
            // The receiver side may be long gone; the record write is then
            // irrelevant, not an error.
            let _ = writer.send(Some(settle_joined(task.await)));
        });
        Self { record }
    }

    /// Spawn the computation onto the runtime and wrap it in one step.
    pub fn spawn<F>(computation: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(tokio::spawn(computation))
    }

    /// Wait for the settlement and replay it.
    ///
    /// Safe to call any number of times; every call reflects the same single
    /// settlement. Returns [`TaskError::Unsettled`] only if the record was
    /// lost before the task settled, which indicates a bookkeeping bug rather
    /// than a normal failure.
    pub async fn outcome(&self) -> Result<T, TaskError<E>> {
        let mut record = self.record.clone();
        let settled = record
            .wait_for(|record| record.is_some())
            .await
            .map_err(|_| TaskError::Unsettled)?;
        match settled.as_ref() {
            Some(outcome) => outcome.clone(),
            None => Err(TaskError::Unsettled),
        }
    }

    /// Peek at the settlement without waiting.
    pub fn try_outcome(&self) -> Option<Result<T, TaskError<E>>> {
        self.record.borrow().clone()
    }

    /// Check whether the wrapped computation has settled yet.
    pub fn is_settled(&self) -> bool {
        self.record.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_replays_resolved_value() {
        let shared: SharedOutcome<i32, String> = SharedOutcome::spawn(async { Ok(3) });

        assert_eq!(shared.outcome().await, Ok(3));
        assert_eq!(shared.outcome().await, Ok(3));
    }

    #[tokio::test]
    async fn test_replays_rejection() {
        let shared: SharedOutcome<i32, String> =
            SharedOutcome::spawn(async { Err("oopsie".to_string()) });

        assert_eq!(
            shared.outcome().await,
            Err(TaskError::Failed("oopsie".to_string()))
        );
        assert_eq!(
            shared.outcome().await,
            Err(TaskError::Failed("oopsie".to_string()))
        );
    }

    #[tokio::test]
    async fn test_handles_late_settlement() {
        let shared: SharedOutcome<i32, String> = SharedOutcome::spawn(async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(4)
        });

        assert_eq!(shared.outcome().await, Ok(4));
    }

    #[tokio::test]
    async fn test_handles_late_rejection() {
        let shared: SharedOutcome<i32, String> = SharedOutcome::spawn(async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Err("ok".to_string())
        });

        assert_eq!(shared.outcome().await, Err(TaskError::Failed("ok".to_string())));
    }

    #[tokio::test]
    async fn test_unobserved_rejection_does_not_disturb_anything() {
        let shared: SharedOutcome<i32, String> =
            SharedOutcome::spawn(async { Err("never looked at".to_string()) });

        // Give the settlement time to land, then drop the wrapper without
        // ever awaiting the outcome. Nothing may panic or leak an error.
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(shared);
    }

    #[tokio::test]
    async fn test_try_outcome_peeks_without_waiting() {
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let shared: SharedOutcome<i32, String> = SharedOutcome::spawn(async move {
            let _ = gate.await;
            Ok(9)
        });

        assert!(!shared.is_settled());
        assert_eq!(shared.try_outcome(), None);

        let _ = release.send(());
        assert_eq!(shared.outcome().await, Ok(9));
        assert!(shared.is_settled());
        assert_eq!(shared.try_outcome(), Some(Ok(9)));
    }

    #[tokio::test]
    async fn test_clones_observe_the_same_record() {
        let shared: SharedOutcome<i32, String> = SharedOutcome::spawn(async { Ok(11) });
        let other = shared.clone();

        assert_eq!(shared.outcome().await, Ok(11));
        assert_eq!(other.outcome().await, Ok(11));
    }

    #[tokio::test]
    async fn test_panicked_computation_is_recorded() {
        let shared: SharedOutcome<i32, String> = SharedOutcome::spawn(async { panic!("boom") });
        assert!(matches!(shared.outcome().await, Err(TaskError::Panicked(_))));
    }
}
