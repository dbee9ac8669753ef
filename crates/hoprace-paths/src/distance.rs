use hoprace_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
///
/// This is the number of unit-speed hops between the points on an empty grid
/// when diagonal moves cost the same as straight ones.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Heuristic;

    #[test]
    fn chebyshev_basics() {
        let a = Point::new(1, 2);
        assert_eq!(chebyshev(a, a), 0);
        assert_eq!(chebyshev(a, Point::new(3, 4)), 2);
        assert_eq!(chebyshev(a, Point::new(-4, 3)), 5);
    }

    #[test]
    fn chebyshev_is_symmetric_max_of_offsets() {
        for dx in -6..=6 {
            for dy in -6..=6 {
                let a = Point::new(2, -1);
                let b = a.shift(dx, dy);
                let d = chebyshev(a, b);
                assert_eq!(d, chebyshev(b, a));
                assert_eq!(d, dx.abs().max(dy.abs()));
                assert_eq!(d == 0, a == b);
            }
        }
    }

    #[test]
    fn missing_endpoint_estimates_zero() {
        let a = Point::new(1, 2);
        assert_eq!(chebyshev.estimate_between(None, None), 0);
        assert_eq!(chebyshev.estimate_between(None, Some(a)), 0);
        assert_eq!(chebyshev.estimate_between(Some(a), None), 0);
        assert_eq!(chebyshev.estimate_between(Some(a), Some(Point::new(3, 4))), 2);
    }

    #[test]
    fn manhattan_basics() {
        assert_eq!(manhattan(Point::new(0, 0), Point::new(3, -4)), 7);
        assert_eq!(manhattan(Point::new(5, 5), Point::new(5, 5)), 0);
    }
}
