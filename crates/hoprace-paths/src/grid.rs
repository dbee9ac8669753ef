//! The track topology: cell availability on a rows × cols rectangle.

use hoprace_core::{Point, Range};

use crate::velocity::Velocity;

/// An inclusive rectangle of blocked cells, `(x1, y1)`–`(x2, y2)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Obstacle {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The blocked cells as a half-open [`Range`]. Inverted corners block
    /// nothing.
    #[inline]
    pub fn range(self) -> Range {
        Range::inclusive(self.x1, self.y1, self.x2, self.y2)
    }
}

/// A read-only view of one grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub pos: Point,
    pub available: bool,
}

/// One candidate move produced by [`Grid::neighbors`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hop {
    /// Landing cell.
    pub to: Point,
    /// Velocity used for the hop; it becomes the hopper's new velocity.
    pub velocity: Velocity,
}

/// A rectangular track of `rows × cols` cells, some of them blocked.
///
/// Availability is fixed at construction. The grid carries no search state,
/// so one grid can back any number of searches, including concurrent ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    bounds: Range,
    available: Vec<bool>,
}

impl Grid {
    /// Build a grid with every cell available except those covered by
    /// `obstacles`.
    ///
    /// Returns `None` if either dimension is not positive. Obstacles are
    /// clipped to the grid; overlapping obstacles are fine.
    pub fn new(rows: i32, cols: i32, obstacles: &[Obstacle]) -> Option<Self> {
        if rows <= 0 || cols <= 0 {
            return None;
        }
        let bounds = Range::new(0, 0, cols, rows);
        let mut grid = Self {
            bounds,
            available: vec![true; bounds.len()],
        };
        for o in obstacles {
            for p in o.range().intersect(bounds).points() {
                let i = grid.width_idx(p);
                grid.available[i] = false;
            }
        }
        Some(grid)
    }

    /// Number of rows (the y extent).
    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.height()
    }

    /// Number of columns (the x extent).
    #[inline]
    pub fn cols(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.available.len()
    }

    /// Always false: a grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// The cell at `(x, y)`, or `None` if out of bounds.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let pos = Point::new(x, y);
        let i = self.idx(pos)?;
        Some(Cell {
            pos,
            available: self.available[i],
        })
    }

    /// Whether `p` is inside the grid and not blocked.
    #[inline]
    pub fn is_available(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| self.available[i])
    }

    /// Cells reachable in one hop from `pos` when arriving at `velocity`.
    ///
    /// Candidates come from [`Velocity::successors`] in its order. A landing
    /// cell is kept only when it is in bounds, available, and `skip` returns
    /// false for it (the search passes its closed set here). `buf` is
    /// cleared first.
    pub fn neighbors(
        &self,
        pos: Point,
        velocity: Velocity,
        buf: &mut Vec<Hop>,
        skip: impl Fn(Point) -> bool,
    ) {
        buf.clear();
        for v in velocity.successors() {
            let to = v.apply(pos);
            if self.is_available(to) && !skip(to) {
                buf.push(Hop { to, velocity: v });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat row-major index. Returns `None` if out of
    /// range.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(self.width_idx(p))
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let w = self.cols() as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    #[inline]
    fn width_idx(&self, p: Point) -> usize {
        (p.y as usize) * (self.cols() as usize) + (p.x as usize)
    }
}
