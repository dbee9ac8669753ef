//! Batch file parsing.
//!
//! ```text
//! <case count>
//! <cols> <rows>
//! <start x> <start y> <end x> <end y>
//! <obstacle count>
//! <x1> <x2> <y1> <y2>        one line per obstacle
//! ...
//! ```
//!
//! Exactly `case count` cases are read; anything after them is ignored.

use std::fs;
use std::path::Path;

use anyhow::Context as _;
use hoprace_core::Point;
use hoprace_dispatch::Task;
use hoprace_paths::Obstacle;

/// Largest accepted grid side.
pub const MAX_GRID_SIZE: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("file is empty")]
    Empty,
    #[error("failed to parse cases count from {0:?}")]
    CaseCountSyntax(String),
    #[error("no test cases provided")]
    NoCases,
    #[error("test case {case}: {kind}")]
    Case { case: u32, kind: CaseError },
}

/// What is wrong with one case of the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaseError {
    #[error("failed to parse grid rows and columns")]
    GridSyntax,
    #[error("invalid grid size")]
    GridSize,
    #[error("failed to parse start and end coordinates")]
    EndpointsSyntax,
    #[error("invalid start coordinates")]
    Start,
    #[error("invalid end coordinates")]
    End,
    #[error("failed to parse obstacles count")]
    ObstacleCountSyntax,
    #[error("invalid obstacles count")]
    ObstacleCount,
    #[error("failed to parse obstacle {0}")]
    ObstacleSyntax(usize),
    #[error("invalid obstacle {0}")]
    Obstacle(usize),
    #[error("unexpected end of input")]
    Truncated,
}

/// Read and parse a batch file.
pub fn parse_file(path: &Path) -> anyhow::Result<Vec<Task>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file {}", path.display()))?;
    parse_str(&text).with_context(|| format!("failed to parse batch file {}", path.display()))
}

/// Parse a batch from its text. Case ids are assigned from 1.
pub fn parse_str(text: &str) -> Result<Vec<Task>, ParseError> {
    let mut lines = text.lines().map(str::trim);
    let first = lines.next().ok_or(ParseError::Empty)?;
    if first.is_empty() && text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let syntax = || ParseError::CaseCountSyntax(first.to_string());
    let count: i64 = first.parse().map_err(|_| syntax())?;
    if count < 1 {
        return Err(ParseError::NoCases);
    }
    let count = u32::try_from(count).map_err(|_| syntax())?;

    let mut tasks = Vec::new();
    for id in 1..=count {
        let task =
            parse_case(id, &mut lines).map_err(|kind| ParseError::Case { case: id, kind })?;
        tasks.push(task);
    }
    Ok(tasks)
}

fn parse_case<'a>(
    id: u32,
    lines: &mut impl Iterator<Item = &'a str>,
) -> Result<Task, CaseError> {
    let mut next = || lines.next().ok_or(CaseError::Truncated);

    let [cols, rows] = ints::<2>(next()?).ok_or(CaseError::GridSyntax)?;
    if !(1..=MAX_GRID_SIZE).contains(&rows) || !(1..=MAX_GRID_SIZE).contains(&cols) {
        return Err(CaseError::GridSize);
    }
    let inside = |x: i32, y: i32| (0..cols).contains(&x) && (0..rows).contains(&y);

    let [sx, sy, ex, ey] = ints::<4>(next()?).ok_or(CaseError::EndpointsSyntax)?;
    if !inside(sx, sy) {
        return Err(CaseError::Start);
    }
    if !inside(ex, ey) {
        return Err(CaseError::End);
    }

    let [count] = ints::<1>(next()?).ok_or(CaseError::ObstacleCountSyntax)?;
    if count < 0 {
        return Err(CaseError::ObstacleCount);
    }
    let mut obstacles = Vec::new();
    for n in 1..=count as usize {
        let [x1, x2, y1, y2] = ints::<4>(next()?).ok_or(CaseError::ObstacleSyntax(n))?;
        if !inside(x1, y1) || !inside(x2, y2) || x1 > x2 || y1 > y2 {
            return Err(CaseError::Obstacle(n));
        }
        obstacles.push(Obstacle::new(x1, y1, x2, y2));
    }

    Ok(
        Task::new(id, rows, cols, Point::new(sx, sy), Point::new(ex, ey))
            .with_obstacles(obstacles),
    )
}

/// Exactly `N` whitespace-separated integers.
fn ints<const N: usize>(line: &str) -> Option<[i32; N]> {
    let mut out = [0; N];
    let mut fields = line.split_whitespace();
    for slot in &mut out {
        *slot = fields.next()?.parse().ok()?;
    }
    fields.next().is_none().then_some(out)
}
