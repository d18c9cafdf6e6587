//! The bounded, order-preserving pipeline transformer

use std::fmt;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use crate::error::{ConfigResult, TaskError};
use crate::reporter::{PipelineEvent, PipelineReporter, TracingReporter};
use crate::task::TaskHandle;
use crate::types::PipelineConfig;
use crate::window::SlidingWindow;

/// Bounded pipeline over a source of already-started task handles.
///
/// A `Conveyor` turns a lazy sequence of [`TaskHandle`]s into a lazy sequence
/// of their results, in submission order, with at most
/// [`parallelism`](PipelineConfig::parallelism) computations outstanding at
/// once. Configuration is validated at construction, before any input can be
/// pulled; a run is started by [`transform`](Conveyor::transform), which
/// consumes the conveyor.
pub struct Conveyor {
    config: PipelineConfig,
    reporter: Box<dyn PipelineReporter>,
}

impl fmt::Debug for Conveyor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conveyor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Conveyor {
    /// Create a conveyor with the given parallelism.
    ///
    /// Fails with [`ConfigError::InvalidParallelism`](crate::ConfigError) for
    /// a parallelism below 2. Use [`serial`] when unbuffered one-at-a-time
    /// execution is wanted.
    pub fn new(parallelism: usize) -> ConfigResult<Self> {
        Self::with_config(PipelineConfig::new(parallelism))
    }

    /// Create a conveyor from a validated configuration.
    pub fn with_config(config: PipelineConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reporter: Box::new(TracingReporter),
        })
    }

    /// Substitute the diagnostic reporter.
    pub fn with_reporter<R: PipelineReporter + 'static>(mut self, reporter: R) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Get the conveyor's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline over `source`.
    ///
    /// The returned stream is pull-driven: each `next()` resumes the internal
    /// loop exactly until a result (or the terminal failure) is ready. Output
    /// order equals submission order regardless of completion order. The
    /// stream is not restartable; after completion or failure it yields
    /// nothing further.
    ///
    /// On the first task failure the pipeline stops pulling input, settles
    /// every handle still buffered in the window (reporting, not propagating,
    /// any additional failures it finds), and ends the stream with the
    /// original failure.
    pub fn transform<S, T, E>(self, source: S) -> impl Stream<Item = Result<T, TaskError<E>>>
    where
        S: Stream<Item = TaskHandle<T, E>>,
        T: Send + 'static,
        E: fmt::Debug + Send + 'static,
    {
        let state = RunState {
            source: Box::pin(source),
            window: SlidingWindow::new(self.config.window_capacity()),
            reporter: self.reporter,
            draining: false,
        };

        stream::try_unfold(state, |mut state| async move {
            loop {
                if state.draining {
                    match state.window.pop_oldest() {
                        Some(handle) => match handle.outcome().await {
                            Ok(value) => return Ok(Some((value, state))),
                            Err(failure) => return Err(state.abort(failure).await),
                        },
                        None => return Ok(None),
                    }
                }

                match state.source.next().await {
                    Some(handle) => {
                        // The handle just pulled plus the full window add up
                        // to `parallelism` outstanding computations.
                        if let Some(oldest) = state.window.exchange(handle) {
                            match oldest.outcome().await {
                                Ok(value) => return Ok(Some((value, state))),
                                Err(failure) => return Err(state.abort(failure).await),
                            }
                        }
                    }
                    None => state.draining = true,
                }
            }
        })
    }
}

/// Per-run state carried through the unfold loop
struct RunState<S, T, E> {
    source: Pin<Box<S>>,
    window: SlidingWindow<TaskHandle<T, E>>,
    reporter: Box<dyn PipelineReporter>,
    draining: bool,
}

impl<S, T, E> RunState<S, T, E>
where
    T: Send + 'static,
    E: fmt::Debug + Send + 'static,
{
    /// Settle every handle left in the window, then hand back the failure
    /// that triggered the abort.
    ///
    /// The buffered computations are already running; returning without
    /// awaiting them would leave their settlements unobserved. Secondary
    /// failures found here go to the reporter only — the first failure is
    /// authoritative.
    async fn abort(mut self, failure: TaskError<E>) -> TaskError<E> {
        self.reporter.report_event(PipelineEvent::TriggeringFailure {
            error: format!("{failure:?}"),
        });
        while let Some(handle) = self.window.pop_oldest() {
            if let Err(secondary) = handle.outcome().await {
                self.reporter.report_event(PipelineEvent::SecondaryFailure {
                    error: format!("{secondary:?}"),
                });
            }
        }
        self.reporter.finish();
        failure
    }
}

/// Run handles one at a time, yielding results in submission order.
///
/// This is the explicit serial counterpart to [`Conveyor::transform`]: at
/// most one computation is outstanding, nothing is buffered, and a failure
/// ends the stream immediately with no window left to settle.
pub fn serial<S, T, E>(source: S) -> impl Stream<Item = Result<T, TaskError<E>>>
where
    S: Stream<Item = TaskHandle<T, E>>,
    T: Send + 'static,
    E: Send + 'static,
{
    stream::try_unfold(Box::pin(source), |mut source| async move {
        match source.next().await {
            Some(handle) => match handle.outcome().await {
                Ok(value) => Ok(Some((value, source))),
                Err(failure) => Err(failure),
            },
            None => Ok(None),
        }
    })
}

/// Fully consume a result stream, discarding values.
///
/// Resolves once the stream is exhausted; propagates the first failure.
pub async fn drain<S, T, E>(stream: S) -> Result<(), E>
where
    S: Stream<Item = Result<T, E>>,
{
    futures::pin_mut!(stream);
    while let Some(item) = stream.next().await {
        item?;
    }
    Ok(())
}

/// Fully consume a result stream, collecting values in emission order.
///
/// Propagates the first failure, discarding any values collected before it.
pub async fn collect_all<S, T, E>(stream: S) -> Result<Vec<T>, E>
where
    S: Stream<Item = Result<T, E>>,
{
    futures::pin_mut!(stream);
    let mut results = Vec::new();
    while let Some(item) = stream.next().await {
        results.push(item?);
    }
    Ok(results)
}
