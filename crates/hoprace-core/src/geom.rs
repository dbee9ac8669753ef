//! Integer track geometry.
//!
//! X counts columns from the left, Y counts rows from the top.

use std::fmt;
use std::ops::{Add, Sub};

/// A cell position on a track.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point `dx` columns and `dy` rows away.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangle of cells with inclusive `min` and exclusive `max` corners.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// The cells `x0..x1` by `y0..y1`.
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// The cells from `(x1, y1)` to `(x2, y2)`, both included.
    ///
    /// Inverted corners (`x1 > x2` or `y1 > y2`) give an empty range. An edge
    /// at `i32::MAX` saturates instead of overflowing.
    pub fn inclusive(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        if x1 > x2 || y1 > y2 {
            return Self::new(x1, y1, x1, y1);
        }
        Self::new(x1, y1, x2.saturating_add(1), y2.saturating_add(1))
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x.saturating_sub(self.min.x).max(0)
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y.saturating_sub(self.min.y).max(0)
    }

    /// Number of cells.
    #[inline]
    pub fn len(self) -> usize {
        self.width() as usize * self.height() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// The cells in both ranges. Disjoint ranges give an empty range.
    pub fn intersect(self, other: Range) -> Self {
        Self::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        )
    }

    /// Every cell, row by row.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let Self { min, max } = self;
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| Point::new(x, y)))
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn point_round_trip() {
        let p = Point::new(3, 7);
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
