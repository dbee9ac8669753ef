use hoprace_core::Point;
use hoprace_paths::Obstacle;

use crate::error::DispatchError;

/// One puzzle of a batch: a grid, its obstacles, and the two endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Case number, used to label the result line.
    pub id: u32,
    pub rows: i32,
    pub cols: i32,
    pub start: Point,
    pub end: Point,
    pub obstacles: Vec<Obstacle>,
}

impl Task {
    /// A task on an obstacle-free grid.
    pub fn new(id: u32, rows: i32, cols: i32, start: Point, end: Point) -> Self {
        Self {
            id,
            rows,
            cols,
            start,
            end,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }
}

/// The completion signal for one submitted task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub id: u32,
    /// The formatted result line, or why the task produced none.
    pub outcome: Result<String, DispatchError>,
}

impl Report {
    /// The result line, if the task succeeded.
    pub fn line(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
