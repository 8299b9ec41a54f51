//! A* search over the 4-connected grid.
//!
//! Unit step cost, Manhattan heuristic. The frontier is an ordered set
//! keyed on `(f, h, insertion sequence, cell)`, so equal-`f` entries pop
//! in a fixed order and repeated searches return identical paths.
//! Neighbours are expanded in [`Direction::ALL`] order.

use std::collections::{BTreeMap, BTreeSet};

use gridcraft_types::{Direction, GridPos};

use crate::error::WorldError;

/// A rectangular grid the pathfinder can search.
pub trait GridMap {
    /// Number of columns.
    fn width(&self) -> u32;

    /// Number of rows.
    fn height(&self) -> u32;

    /// Whether an agent may stand on `pos`. Every cell is open by default.
    fn is_passable(&self, pos: GridPos) -> bool {
        let _ = pos;
        true
    }
}

/// An obstacle-free grid of the given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenGrid {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl OpenGrid {
    /// Create an open grid.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl GridMap for OpenGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Manhattan distance between two cells.
pub const fn manhattan(a: GridPos, b: GridPos) -> u32 {
    a.manhattan(b)
}

/// Find a minimal sequence of moves from `start` to `goal`.
///
/// Returns an empty list when `start == goal`. Fails with
/// [`WorldError::OutOfBounds`] if either endpoint lies outside the grid and
/// with [`WorldError::NoPath`] if the goal is unreachable.
pub fn shortest_path<G>(grid: &G, start: GridPos, goal: GridPos) -> Result<Vec<Direction>, WorldError>
where
    G: GridMap + ?Sized,
{
    let (width, height) = (grid.width(), grid.height());
    for position in [start, goal] {
        if !position.in_bounds(width, height) {
            return Err(WorldError::OutOfBounds {
                position,
                width,
                height,
            });
        }
    }
    if start == goal {
        return Ok(Vec::new());
    }

    let mut open: BTreeSet<(u32, u32, u64, GridPos)> = BTreeSet::new();
    let mut cost_so_far: BTreeMap<GridPos, u32> = BTreeMap::new();
    let mut came_from: BTreeMap<GridPos, (GridPos, Direction)> = BTreeMap::new();
    let mut closed: BTreeSet<GridPos> = BTreeSet::new();
    let mut sequence: u64 = 0;

    let start_h = manhattan(start, goal);
    open.insert((start_h, start_h, sequence, start));
    cost_so_far.insert(start, 0);

    while let Some((_, _, _, current)) = open.pop_first() {
        if current == goal {
            return Ok(reconstruct(&came_from, start, goal));
        }
        if !closed.insert(current) {
            continue;
        }
        let Some(&g) = cost_so_far.get(&current) else {
            continue;
        };
        let Some(tentative) = g.checked_add(1) else {
            continue;
        };

        for direction in Direction::ALL {
            let Some(next) = current.neighbor(direction, width, height) else {
                continue;
            };
            if closed.contains(&next) || !grid.is_passable(next) {
                continue;
            }
            let improves = cost_so_far
                .get(&next)
                .is_none_or(|&existing| tentative < existing);
            if !improves {
                continue;
            }
            cost_so_far.insert(next, tentative);
            came_from.insert(next, (current, direction));
            sequence = sequence.saturating_add(1);
            let h = manhattan(next, goal);
            open.insert((tentative.saturating_add(h), h, sequence, next));
        }
    }

    Err(WorldError::NoPath {
        from: start,
        to: goal,
    })
}

/// Walk the predecessor map back from `goal` to `start`.
fn reconstruct(
    came_from: &BTreeMap<GridPos, (GridPos, Direction)>,
    start: GridPos,
    goal: GridPos,
) -> Vec<Direction> {
    let mut moves = Vec::new();
    let mut current = goal;
    while current != start {
        let Some(&(previous, direction)) = came_from.get(&current) else {
            break;
        };
        moves.push(direction);
        current = previous;
    }
    moves.reverse();
    moves
}

/// The cells visited when applying `moves` from `start`, excluding `start`.
///
/// Each step is clamped at the grid edge, exactly as the executor moves
/// an agent.
pub fn path_positions<G>(grid: &G, start: GridPos, moves: &[Direction]) -> Vec<GridPos>
where
    G: GridMap + ?Sized,
{
    let (width, height) = (grid.width(), grid.height());
    let mut current = start;
    moves
        .iter()
        .map(|&direction| {
            current = current.step_clamped(direction, width, height).0;
            current
        })
        .collect()
}
