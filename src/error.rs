use thiserror::Error;

use crate::Pos;

/// Everything that can stop a solve before the search starts.
///
/// Running out of frontier is not an error, see [`crate::Outcome::success`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("puzzle must be 3 rows of 3 tiles, got row lengths {0:?}")]
    PuzzleShape(Vec<usize>),

    #[error("puzzle is not a permutation of 0-8: {0:?}")]
    NotPermutation(Vec<u8>),

    #[error("map is empty")]
    EmptyMap,

    #[error("map row {row} has {len} cells, expected {expected}")]
    RaggedMap { row: usize, len: usize, expected: usize },

    #[error("map must contain exactly one agent start 'P', found {0}")]
    StartCount(usize),

    #[error("{what} {pos} is outside the {width}x{height} map")]
    OutOfBounds {
        what: &'static str,
        pos: Pos,
        width: i32,
        height: i32,
    },

    #[error("heuristic {heuristic} cannot be used for {problem}")]
    UnsupportedHeuristic {
        heuristic: crate::HeuristicKind,
        problem: &'static str,
    },

    #[error("goal mode {mode} cannot be used for {problem}")]
    UnsupportedGoalMode {
        mode: crate::GoalMode,
        problem: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cannot parse yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot write json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
