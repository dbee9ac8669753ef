//! Shortest-hop search for the hopping race.
//!
//! A hopper travels over a rectangular [`Grid`] with blocked rectangles
//! ([`Obstacle`]s). Every hop moves it by its current [`Velocity`], and before
//! each hop the velocity may change by at most one unit per axis, staying
//! within `-3..=3`. [`Pathfinder`] finds the minimum number of hops between
//! two cells with an A* search:
//!
//! - the grid is immutable topology and can be shared between searches;
//! - every [`find_path`](Pathfinder::find_path) call allocates its own
//!   scratch table, so no search state leaks between runs;
//! - the frontier is an [`OpenQueue`], an indexed binary heap that supports
//!   removing a node already queued when a cheaper arrival is found.
//!
//! # Example
//!
//! ```
//! use hoprace_core::Point;
//! use hoprace_paths::{Grid, Pathfinder, chebyshev};
//!
//! let grid = Grid::new(3, 3, &[]).unwrap();
//! let path = Pathfinder::new(&grid, chebyshev)
//!     .find_path(Point::new(0, 0), Point::new(2, 2))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(path.hops(), 2);
//! ```

mod distance;
mod grid;
mod pathfinder;
mod queue;
mod traits;
mod velocity;

pub use distance::{chebyshev, manhattan};
pub use grid::{Cell, Grid, Hop, Obstacle};
pub use pathfinder::{Path, PathStep, Pathfinder, SearchError};
pub use queue::{OpenQueue, Priority};
pub use traits::Heuristic;
pub use velocity::{MAX_SPEED, MIN_SPEED, Velocity};
