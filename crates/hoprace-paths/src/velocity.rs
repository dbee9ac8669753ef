use std::fmt;
use std::ops::RangeInclusive;

use hoprace_core::Point;

/// Lowest legal speed on either axis.
pub const MIN_SPEED: i32 = -3;
/// Highest legal speed on either axis.
pub const MAX_SPEED: i32 = 3;

/// Speed of a hopper in cells per hop, per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    pub x: i32,
    pub y: i32,
}

impl Velocity {
    /// Standing still.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The velocity that carries a hopper from `from` to `to` in one hop.
    #[inline]
    pub fn between(from: Point, to: Point) -> Self {
        let d = to - from;
        Self::new(d.x, d.y)
    }

    /// Whether both axes lie within `MIN_SPEED..=MAX_SPEED`.
    #[inline]
    pub fn is_legal(self) -> bool {
        (MIN_SPEED..=MAX_SPEED).contains(&self.x) && (MIN_SPEED..=MAX_SPEED).contains(&self.y)
    }

    /// Position reached by hopping once from `p` at this velocity.
    #[inline]
    pub fn apply(self, p: Point) -> Point {
        p.shift(self.x, self.y)
    }

    /// Every velocity reachable in one hop from `self`, in search order.
    ///
    /// Each axis may change by -1, 0 or +1 and is kept within the legal
    /// bounds. The y axis is the outer loop. Standing still (the zero
    /// velocity) is never produced, as a hop must move the hopper.
    pub fn successors(self) -> impl Iterator<Item = Velocity> {
        let xs = axis_range(self.x);
        axis_range(self.y)
            .flat_map(move |y| xs.clone().map(move |x| Velocity::new(x, y)))
            .filter(|v| *v != Velocity::ZERO)
    }
}

/// Speeds reachable on one axis from speed `v`, clamped to the legal bounds.
#[inline]
fn axis_range(v: i32) -> RangeInclusive<i32> {
    (v - 1).max(MIN_SPEED)..=(v + 1).min(MAX_SPEED)
}

impl fmt::Display for Velocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successors_from_rest() {
        let vs: Vec<_> = Velocity::ZERO.successors().collect();
        assert_eq!(vs.len(), 8);
        assert!(!vs.contains(&Velocity::ZERO));
        // y outer, x inner
        assert_eq!(vs[0], Velocity::new(-1, -1));
        assert_eq!(vs[1], Velocity::new(0, -1));
        assert_eq!(vs[7], Velocity::new(1, 1));
    }

    #[test]
    fn successors_keep_current_speed() {
        let v = Velocity::new(2, 0);
        let vs: Vec<_> = v.successors().collect();
        assert_eq!(vs.len(), 9);
        assert!(vs.contains(&v));
    }

    #[test]
    fn successors_are_clamped_at_the_bound() {
        let v = Velocity::new(MAX_SPEED, MIN_SPEED);
        let vs: Vec<_> = v.successors().collect();
        // two choices on each axis
        assert_eq!(vs.len(), 4);
        for s in vs {
            assert!(s.is_legal());
            assert!((s.x - v.x).abs() <= 1 && (s.y - v.y).abs() <= 1);
        }
    }

    #[test]
    fn between_and_apply_agree() {
        let a = Point::new(3, 1);
        let b = Point::new(1, 2);
        let v = Velocity::between(a, b);
        assert_eq!(v, Velocity::new(-2, 1));
        assert_eq!(v.apply(a), b);
    }

    #[test]
    fn legality() {
        assert!(Velocity::new(-3, 3).is_legal());
        assert!(!Velocity::new(4, 0).is_legal());
        assert!(!Velocity::new(0, -4).is_legal());
    }
}
