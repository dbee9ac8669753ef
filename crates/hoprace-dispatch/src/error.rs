//! Error taxonomy for task processing and dispatcher lifecycle.

use std::time::Duration;

use hoprace_paths::SearchError;

pub type Result<T> = core::result::Result<T, DispatchError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The task describes a grid with a non-positive dimension.
    #[error("failed to create grid: invalid size {rows}x{cols}")]
    InvalidGrid { rows: i32, cols: i32 },

    /// The search rejected the task's endpoints.
    #[error("failed to find path: {0}")]
    Search(#[from] SearchError),

    /// The dispatcher was configured without a queue or without workers.
    #[error("dispatcher is disabled: pipe size and pool size must be positive")]
    Disabled,

    /// The dispatcher is stopping or stopped and takes no more work.
    #[error("dispatcher is closed")]
    Closed,

    /// A worker could not be started.
    #[error("failed to spawn worker: {0}")]
    Spawn(String),

    /// Some workers were still busy when the stop deadline passed.
    #[error("workers still running after {0:?}")]
    ShutdownTimeout(Duration),
}
