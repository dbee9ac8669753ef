use hoprace_core::Point;

/// Estimate of the remaining hop count between two cells.
///
/// The search only returns a route with the fewest hops when the estimate
/// never exceeds the true remaining cost. [`chebyshev`](crate::chebyshev)
/// counts unit moves, so it can overshoot once the hopper moves faster than
/// one cell per hop.
pub trait Heuristic {
    fn estimate(&self, from: Point, to: Point) -> i32;

    /// Like [`estimate`](Heuristic::estimate), but a missing endpoint
    /// estimates to 0.
    fn estimate_between(&self, from: Option<Point>, to: Option<Point>) -> i32 {
        match (from, to) {
            (Some(a), Some(b)) => self.estimate(a, b),
            _ => 0,
        }
    }
}

impl<F> Heuristic for F
where
    F: Fn(Point, Point) -> i32,
{
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        self(from, to)
    }
}
