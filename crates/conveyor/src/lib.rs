//! Conveyor - Bounded, order-preserving async pipeline
//!
//! A small concurrency primitive: given a lazily produced stream of
//! already-started asynchronous computations, run at most N of them
//! concurrently while emitting their results in submission order.
//!
//! # Overview
//!
//! Conveyor provides a pipeline transformer where:
//! - Each input is a [`TaskHandle`], a capability over a computation that is
//!   already running on the tokio runtime — pulling the Nth handle from the
//!   source is what starts the Nth computation
//! - A sliding window of `parallelism - 1` handles plus the one just pulled
//!   bounds the outstanding computations at exactly `parallelism`
//! - Output order equals submission order, enforced by the window's FIFO
//!   discipline rather than by completion time
//! - The first failure ends the output stream; the computations still in the
//!   window are settled quietly so no failure goes unobserved
//!
//! The companion primitive, [`SharedOutcome`], captures a running
//! computation's single settlement at construction time and replays it to any
//! number of later observers.
//!
//! # Example
//!
//! ```rust
//! use conveyor::{collect_all, Conveyor, TaskHandle};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = futures::stream::iter(0..20u32)
//!         .map(|value| TaskHandle::spawn(async move { Ok::<_, String>(value * 2) }));
//!
//!     let conveyor = Conveyor::new(4)?;
//!     let doubled = collect_all(conveyor.transform(source)).await?;
//!
//!     assert_eq!(doubled, (0..20).map(|value| value * 2).collect::<Vec<_>>());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod reporter;
pub mod task;
pub mod types;

mod window;

pub use error::{ConfigError, ConveyorError, TaskError};
pub use outcome::SharedOutcome;
pub use pipeline::{collect_all, drain, serial, Conveyor};
pub use reporter::{NoOpReporter, PipelineEvent, PipelineReporter, TracingReporter};
pub use task::TaskHandle;
pub use types::PipelineConfig;

use std::future::Future;
use std::pin::Pin;

/// A boxed future that is Send and can be used across thread boundaries
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
