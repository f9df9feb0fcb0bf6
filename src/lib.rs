use std::fmt::{Display, Write};

use serde::{Deserialize, Serialize};

pub mod baseline;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod maze;
pub mod report;
pub mod rle;
pub mod search;
pub mod solver;
pub mod tiles;

pub use config::{Config, GoalMode, HeuristicKind, PortalLayout};
pub use error::{Error, Result};
pub use maze::{AgentState, Maze};
pub use search::{find, Outcome, SearchProblem, SearchResult};
pub use solver::{solve_maze, solve_tiles};
pub use tiles::{parse_tiles, TilePuzzle, Tiles};

/// A move label, shared by both puzzles.
///
/// For the tile grid it names the direction the tile slides into the blank
/// (so the blank itself moves the opposite way). For the maze it is the
/// direction the agent walks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Expansion order used by every successor generator.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector in screen coordinates (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.letter())
    }
}

/// A grid cell, `x` is the column and `y` the row.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Pos {
        Pos { x, y }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn step(self, direction: Direction) -> Pos {
        let (dx, dy) = direction.delta();
        Pos::new(self.x + dx, self.y + dy)
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opposite_directions_cancel() {
        let p = Pos::new(3, 4);
        assert_eq!(p.step(Direction::Up).step(Direction::Down), p);
        assert_eq!(p.step(Direction::Left).step(Direction::Right), p);
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = Pos::new(1, 7);
        let b = Pos::new(4, 2);
        assert_eq!(a.manhattan(b), 8);
        assert_eq!(b.manhattan(a), 8);
    }
}
