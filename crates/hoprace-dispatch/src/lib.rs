//! Concurrent batch solving of hopping race tasks.
//!
//! A [`Dispatcher`] owns a bounded task queue, a bounded report queue and a
//! fixed pool of worker threads. Each worker takes the next [`Task`], hands
//! it to a [`Processor`] (by default [`GridProcessor`], which builds a fresh
//! grid and runs the search) and sends back exactly one [`Report`]. Failed
//! tasks are reported too, so a caller can count reports against
//! submissions.
//!
//! ```no_run
//! use std::time::Duration;
//! use hoprace_core::Point;
//! use hoprace_dispatch::{Dispatcher, Task};
//!
//! let mut d = Dispatcher::builder().pipe_size(8).pool_size(4).start()?;
//! d.submit(Task::new(1, 3, 3, Point::new(0, 0), Point::new(2, 2)))?;
//! let report = d.results().recv().unwrap();
//! assert_eq!(report.line(), Some("Test case #1: Optimal solution takes 2 hops."));
//! d.stop(Duration::from_secs(1))?;
//! # Ok::<(), hoprace_dispatch::DispatchError>(())
//! ```

mod dispatcher;
mod error;
mod logger;
mod pool;
mod processor;
mod task;
mod worker;

pub use dispatcher::{DEFAULT_PIPE_SIZE, Dispatcher, DispatcherBuilder, Submitter};
pub use error::{DispatchError, Result};
pub use logger::{Fields, Logger};
pub use processor::{GridProcessor, Processor};
pub use task::{Report, Task};
