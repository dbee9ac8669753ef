use hoprace_paths::{Grid, Path, Pathfinder, chebyshev};

use crate::error::{DispatchError, Result};
use crate::task::Task;

/// Turns one task into its result line.
///
/// Implementations are shared by every worker of a pool.
pub trait Processor: Send + Sync {
    fn process(&self, task: &Task) -> Result<String>;
}

impl<F> Processor for F
where
    F: Fn(&Task) -> Result<String> + Send + Sync,
{
    fn process(&self, task: &Task) -> Result<String> {
        self(task)
    }
}

/// Solves a task on a freshly built [`Grid`] with the Chebyshev estimate.
///
/// Nothing is cached between calls, so concurrent calls never share search
/// state.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridProcessor;

impl GridProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Build the task's grid.
    pub fn grid(&self, task: &Task) -> Result<Grid> {
        Grid::new(task.rows, task.cols, &task.obstacles).ok_or(DispatchError::InvalidGrid {
            rows: task.rows,
            cols: task.cols,
        })
    }

    /// Run the search for `task`; `Ok(None)` means the end is unreachable.
    pub fn solve(&self, task: &Task) -> Result<Option<Path>> {
        let grid = self.grid(task)?;
        let path = Pathfinder::new(&grid, chebyshev).find_path(task.start, task.end)?;
        Ok(path)
    }
}

impl Processor for GridProcessor {
    fn process(&self, task: &Task) -> Result<String> {
        Ok(match self.solve(task)? {
            Some(path) => format!(
                "Test case #{}: Optimal solution takes {} hops.",
                task.id,
                path.hops()
            ),
            None => format!("Test case #{}: No solution.", task.id),
        })
    }
}
