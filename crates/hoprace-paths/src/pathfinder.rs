use hoprace_core::Point;

use crate::grid::{Grid, Hop};
use crate::queue::{OpenQueue, Priority};
use crate::traits::Heuristic;
use crate::velocity::Velocity;

/// Reasons a search refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("start and finish cells must be provided")]
    EndpointsRequired,
    #[error("start cell is out of grid: {0}")]
    StartOutOfGrid(Point),
    #[error("finish cell is out of grid: {0}")]
    FinishOutOfGrid(Point),
    #[error("finish cell is not available: {0}")]
    FinishNotAvailable(Point),
}

// ---------------------------------------------------------------------------
// Per-search scratch
// ---------------------------------------------------------------------------

/// Search bookkeeping for one cell. Lives only as long as one search.
#[derive(Clone, Debug, Default)]
struct Node {
    g: i32,
    h: i32,
    f: i32,
    velocity: Velocity,
    parent: Option<usize>,
    open: bool,
    closed: bool,
}

/// One cell of a found path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub pos: Point,
    /// Velocity the hopper had on landing here.
    pub velocity: Velocity,
    /// Hops taken from the start.
    pub g: i32,
}

/// A route from start to finish, both included.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Number of hops, i.e. the accumulated cost of the final cell.
    pub fn hops(&self) -> i32 {
        self.steps.last().map_or(0, |s| s.g)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathStep> {
        self.steps.iter()
    }

    /// Number of cells on the path (hops + 1).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<&PathStep> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// The visited positions in order.
    pub fn points(&self) -> Vec<Point> {
        self.steps.iter().map(|s| s.pos).collect()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;
    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

// ---------------------------------------------------------------------------
// Pathfinder
// ---------------------------------------------------------------------------

/// A* search for the fewest hops between two cells of a [`Grid`].
///
/// Every hop costs one unit. Nodes are keyed by position only: when a cell is
/// reached again at a cost lower than *or equal to* the recorded one, the new
/// arrival (and its velocity) replaces the old one. The result is therefore
/// reproducible but not a search over the full (position, velocity) space.
pub struct Pathfinder<'g, H> {
    grid: &'g Grid,
    heuristic: H,
}

impl<'g, H: Heuristic> Pathfinder<'g, H> {
    pub fn new(grid: &'g Grid, heuristic: H) -> Self {
        Self { grid, heuristic }
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    /// Find the shortest route from `start` to `finish`.
    ///
    /// Returns `Ok(None)` when the finish cannot be reached; that is a normal
    /// outcome. Errors are reserved for unusable endpoints and are reported
    /// before any search state is built.
    pub fn find_path(
        &self,
        start: impl Into<Option<Point>>,
        finish: impl Into<Option<Point>>,
    ) -> Result<Option<Path>, SearchError> {
        let (Some(start), Some(finish)) = (start.into(), finish.into()) else {
            return Err(SearchError::EndpointsRequired);
        };
        let grid = self.grid;
        let si = grid.idx(start).ok_or(SearchError::StartOutOfGrid(start))?;
        let fi = grid.idx(finish).ok_or(SearchError::FinishOutOfGrid(finish))?;
        if !grid.is_available(finish) {
            return Err(SearchError::FinishNotAvailable(finish));
        }

        let mut nodes = vec![Node::default(); grid.len()];
        {
            let s = &mut nodes[si];
            s.g = 0;
            s.h = self.heuristic.estimate(start, finish);
            s.f = s.g + s.h;
            s.velocity = Velocity::ZERO;
            s.open = true;
        }

        let mut open = OpenQueue::new(grid.len());
        open.push(si, priority(&nodes[si]));

        let mut hops: Vec<Hop> = Vec::with_capacity(9);
        let mut expanded = 0usize;

        while let Some(ci) = open.pop() {
            nodes[ci].open = false;
            nodes[ci].closed = true;

            if ci == fi {
                let path = reconstruct(grid, &nodes, fi);
                log::debug!(
                    "path {} -> {} found: {} hops, {} nodes expanded",
                    start,
                    finish,
                    path.hops(),
                    expanded
                );
                return Ok(Some(path));
            }
            expanded += 1;

            let current = grid.point(ci);
            let g = nodes[ci].g + 1;
            grid.neighbors(current, nodes[ci].velocity, &mut hops, |p| {
                grid.idx(p).is_some_and(|i| nodes[i].closed)
            });

            for hop in &hops {
                let Some(ni) = grid.idx(hop.to) else {
                    continue;
                };
                let n = &mut nodes[ni];

                // A cheaper or equally cheap arrival reopens the cell.
                if g <= n.g {
                    if n.open {
                        open.remove(ni);
                    }
                    n.open = false;
                    n.closed = false;
                }

                if !n.open && !n.closed {
                    n.g = g;
                    n.h = self.heuristic.estimate(hop.to, finish);
                    n.f = n.g + n.h;
                    n.velocity = hop.velocity;
                    n.parent = Some(ci);
                    n.open = true;
                    open.push(ni, priority(n));
                }
            }
        }

        log::debug!(
            "no path {} -> {}: {} nodes expanded",
            start,
            finish,
            expanded
        );
        Ok(None)
    }
}

#[inline]
fn priority(n: &Node) -> Priority {
    Priority {
        f: n.f,
        h: n.h,
        g: n.g,
    }
}

/// Walk parent links back from `last` and return the route in travel order.
fn reconstruct(grid: &Grid, nodes: &[Node], last: usize) -> Path {
    let mut steps = Vec::new();
    let mut cur = Some(last);
    while let Some(i) = cur {
        let n = &nodes[i];
        steps.push(PathStep {
            pos: grid.point(i),
            velocity: n.velocity,
            g: n.g,
        });
        cur = n.parent;
    }
    steps.reverse();
    Path { steps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::chebyshev;
    use crate::grid::Obstacle;
    use rand::{Rng, SeedableRng};

    fn cross() -> Grid {
        Grid::new(
            3,
            3,
            &[Obstacle::new(1, 0, 1, 2), Obstacle::new(0, 1, 2, 1)],
        )
        .unwrap()
    }

    /// Checks that consecutive steps obey the hopping rules.
    fn assert_legal(grid: &Grid, path: &Path) {
        let steps = path.steps();
        assert_eq!(steps[0].velocity, Velocity::ZERO);
        assert_eq!(steps[0].g, 0);
        for w in steps.windows(2) {
            let (a, b) = (w[0], w[1]);
            assert!(grid.is_available(b.pos));
            assert_eq!(Velocity::between(a.pos, b.pos), b.velocity);
            assert!(b.velocity.is_legal());
            assert!((b.velocity.x - a.velocity.x).abs() <= 1);
            assert!((b.velocity.y - a.velocity.y).abs() <= 1);
            assert_eq!(b.g, a.g + 1);
        }
        assert_eq!(path.hops() as usize, path.len() - 1);
    }

    #[test]
    fn diagonal_in_two_hops() {
        let grid = Grid::new(3, 3, &[]).unwrap();
        let pf = Pathfinder::new(&grid, chebyshev);
        let path = pf
            .find_path(Point::new(0, 0), Point::new(2, 2))
            .unwrap()
            .unwrap();
        assert_eq!(path.hops(), 2);
        assert_eq!(
            path.steps(),
            &[
                PathStep {
                    pos: Point::new(0, 0),
                    velocity: Velocity::ZERO,
                    g: 0
                },
                PathStep {
                    pos: Point::new(1, 1),
                    velocity: Velocity::new(1, 1),
                    g: 1
                },
                PathStep {
                    pos: Point::new(2, 2),
                    velocity: Velocity::new(1, 1),
                    g: 2
                },
            ]
        );
    }

    #[test]
    fn blocked_finish_has_no_path() {
        let grid = cross();
        let pf = Pathfinder::new(&grid, chebyshev);
        assert_eq!(pf.find_path(Point::new(0, 0), Point::new(2, 2)), Ok(None));
    }

    #[test]
    fn corridor_accelerates() {
        // 1 row, 10 columns: speeds 1, 2, 3, 3 cover 9 cells.
        let grid = Grid::new(1, 10, &[]).unwrap();
        let pf = Pathfinder::new(&grid, chebyshev);
        let path = pf
            .find_path(Point::new(0, 0), Point::new(9, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.hops(), 4);
        assert_eq!(
            path.points(),
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(3, 0),
                Point::new(6, 0),
                Point::new(9, 0),
            ]
        );
        assert_legal(&grid, &path);
    }

    #[test]
    fn start_is_finish() {
        let grid = Grid::new(2, 2, &[]).unwrap();
        let pf = Pathfinder::new(&grid, chebyshev);
        let path = pf
            .find_path(Point::new(1, 1), Point::new(1, 1))
            .unwrap()
            .unwrap();
        assert_eq!(path.hops(), 0);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn detour_around_wall() {
        let grid = Grid::new(5, 5, &[Obstacle::new(1, 2, 4, 3)]).unwrap();
        let pf = Pathfinder::new(&grid, chebyshev);
        let path = pf
            .find_path(Point::new(4, 0), Point::new(4, 4))
            .unwrap()
            .unwrap();
        assert_eq!(path.hops(), 7);
        assert_eq!(
            path.points(),
            vec![
                Point::new(4, 0),
                Point::new(3, 1),
                Point::new(1, 1),
                Point::new(0, 2),
                Point::new(0, 3),
                Point::new(1, 4),
                Point::new(3, 4),
                Point::new(4, 4),
            ]
        );
        assert_legal(&grid, &path);
    }

    #[test]
    fn endpoint_validation() {
        let grid = Grid::new(3, 3, &[Obstacle::new(2, 2, 2, 2)]).unwrap();
        let pf = Pathfinder::new(&grid, chebyshev);
        let p = Point::new(0, 0);
        assert_eq!(
            pf.find_path(None, Point::new(1, 1)),
            Err(SearchError::EndpointsRequired)
        );
        assert_eq!(pf.find_path(p, None), Err(SearchError::EndpointsRequired));
        assert_eq!(
            pf.find_path(Point::new(3, 3), p),
            Err(SearchError::StartOutOfGrid(Point::new(3, 3)))
        );
        assert_eq!(
            pf.find_path(p, Point::new(3, 3)),
            Err(SearchError::FinishOutOfGrid(Point::new(3, 3)))
        );
        assert_eq!(
            pf.find_path(p, Point::new(2, 2)),
            Err(SearchError::FinishNotAvailable(Point::new(2, 2)))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            SearchError::EndpointsRequired.to_string(),
            "start and finish cells must be provided"
        );
        assert_eq!(
            SearchError::StartOutOfGrid(Point::new(3, 3)).to_string(),
            "start cell is out of grid: (3, 3)"
        );
        assert_eq!(
            SearchError::FinishOutOfGrid(Point::new(-1, 0)).to_string(),
            "finish cell is out of grid: (-1, 0)"
        );
        assert_eq!(
            SearchError::FinishNotAvailable(Point::new(2, 2)).to_string(),
            "finish cell is not available: (2, 2)"
        );
    }

    #[test]
    fn blocked_start_may_still_leave() {
        // Only the finish must be available.
        let grid = Grid::new(1, 3, &[Obstacle::new(0, 0, 0, 0)]).unwrap();
        let pf = Pathfinder::new(&grid, chebyshev);
        let path = pf.find_path(Point::new(0, 0), Point::new(2, 0)).unwrap();
        assert_eq!(path.map(|p| p.hops()), Some(2));
    }

    #[test]
    fn searches_are_repeatable() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
        for _ in 0..100 {
            let rows = rng.random_range(1..15);
            let cols = rng.random_range(1..15);
            let obstacles: Vec<_> = (0..rng.random_range(0..5))
                .map(|_| {
                    let x = rng.random_range(0..cols);
                    let y = rng.random_range(0..rows);
                    Obstacle::new(x, y, x + rng.random_range(0..4), y + rng.random_range(0..4))
                })
                .collect();
            let start = Point::new(rng.random_range(0..cols), rng.random_range(0..rows));
            let finish = Point::new(rng.random_range(0..cols), rng.random_range(0..rows));

            let a = Grid::new(rows, cols, &obstacles).unwrap();
            let b = Grid::new(rows, cols, &obstacles).unwrap();
            let first = Pathfinder::new(&a, chebyshev).find_path(start, finish);
            let second = Pathfinder::new(&b, chebyshev).find_path(start, finish);
            // The same grid can also be searched twice.
            let again = Pathfinder::new(&a, chebyshev).find_path(start, finish);
            assert_eq!(first, second);
            assert_eq!(first, again);

            if let Ok(Some(path)) = first {
                assert_eq!(path.first().map(|s| s.pos), Some(start));
                assert_eq!(path.last().map(|s| s.pos), Some(finish));
                assert_legal(&a, &path);
            }
        }
    }
}
