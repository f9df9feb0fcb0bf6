//! Solver configuration, read from YAML.
//!
//! ```yaml
//! heuristic: mst-lower-bound
//! goal_mode: full-multi-goal
//! ghost_turns: 5
//! portals: opposite
//! exit: { x: 3, y: 4 }
//! ```
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::heuristic::TargetHeuristic;
use crate::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    ManhattanSum,
    NearestTarget,
    MstLowerBound,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalMode {
    /// One search to a single terminal goal.
    #[default]
    Single,
    /// Chain of searches, each to the closest remaining target.
    IterativeNearest,
    /// One search that must clear every target.
    FullMultiGoal,
}

/// Built-in portal placements on the cells diagonally inside the map corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortalLayout {
    None,
    /// Each corner portal exits at the diagonally opposite one.
    #[default]
    Opposite,
    /// Each corner portal exits at the next one clockwise.
    Cycle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalLink {
    pub from: Pos,
    pub to: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Points {
    pub pearl: u32,
    pub gem: u32,
}

impl Default for Points {
    fn default() -> Self {
        Points { pearl: 1, gem: 5 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults per problem when absent, see [`Config::check_tiles`] and
    /// [`Config::target_heuristic`].
    pub heuristic: Option<HeuristicKind>,
    pub goal_mode: GoalMode,
    /// Apply the sticky pair rule to the tile puzzle.
    pub sticky_pairs: bool,
    /// Moves of power mode granted by a gem.
    pub ghost_turns: u8,
    pub portals: PortalLayout,
    /// Extra one-way portals, overriding the layout on their `from` cell.
    pub portal_links: Vec<PortalLink>,
    pub exit: Option<Pos>,
    pub points: Points,
    /// Expanded nodes shallower than this go into the exported trace.
    pub trace_depth: u32,
    pub max_expansions: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            heuristic: None,
            goal_mode: GoalMode::Single,
            sticky_pairs: true,
            ghost_turns: 5,
            portals: PortalLayout::Opposite,
            portal_links: Vec::new(),
            exit: None,
            points: Points::default(),
            trace_depth: 20,
            max_expansions: None,
        }
    }
}

impl Config {
    pub fn from_yaml(s: &str) -> Result<Config> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn read_yaml_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let content = std::fs::read_to_string(&path)?;
        let config = Config::from_yaml(&content)?;
        log::debug!("read config from {}", path.as_ref().display());
        Ok(config)
    }

    /// The tile puzzle only knows one goal and one heuristic.
    pub fn check_tiles(&self) -> Result<()> {
        if self.goal_mode != GoalMode::Single {
            return Err(Error::UnsupportedGoalMode {
                mode: self.goal_mode,
                problem: "the tile puzzle",
            });
        }
        match self.heuristic {
            None | Some(HeuristicKind::ManhattanSum) => Ok(()),
            Some(heuristic) => Err(Error::UnsupportedHeuristic {
                heuristic,
                problem: "the tile puzzle",
            }),
        }
    }

    /// The estimator for maze searches under the configured goal mode.
    ///
    /// Iterative legs only need to reach one target, so the spanning tree
    /// bound would overestimate there and is rejected.
    pub fn target_heuristic(&self) -> Result<TargetHeuristic> {
        match (self.heuristic, self.goal_mode) {
            (Some(HeuristicKind::ManhattanSum), _) => Err(Error::UnsupportedHeuristic {
                heuristic: HeuristicKind::ManhattanSum,
                problem: "the maze",
            }),
            (Some(HeuristicKind::MstLowerBound), GoalMode::IterativeNearest) => {
                Err(Error::UnsupportedHeuristic {
                    heuristic: HeuristicKind::MstLowerBound,
                    problem: "iterative-nearest legs",
                })
            }
            (Some(HeuristicKind::NearestTarget), _) | (None, GoalMode::IterativeNearest) => {
                Ok(TargetHeuristic::Nearest)
            }
            (Some(HeuristicKind::MstLowerBound), _) | (None, _) => Ok(TargetHeuristic::SpanningTree),
        }
    }
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HeuristicKind::ManhattanSum => "manhattan-sum",
            HeuristicKind::NearestTarget => "nearest-target",
            HeuristicKind::MstLowerBound => "mst-lower-bound",
        })
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "manhattan-sum" => Ok(HeuristicKind::ManhattanSum),
            "nearest-target" => Ok(HeuristicKind::NearestTarget),
            "mst-lower-bound" => Ok(HeuristicKind::MstLowerBound),
            _ => Err(format!(
                "unknown heuristic {s:?}, expected manhattan-sum, nearest-target or mst-lower-bound"
            )),
        }
    }
}

impl Display for GoalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GoalMode::Single => "single",
            GoalMode::IterativeNearest => "iterative-nearest",
            GoalMode::FullMultiGoal => "full-multi-goal",
        })
    }
}

impl FromStr for GoalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "single" => Ok(GoalMode::Single),
            "iterative-nearest" => Ok(GoalMode::IterativeNearest),
            "full-multi-goal" => Ok(GoalMode::FullMultiGoal),
            _ => Err(format!(
                "unknown goal mode {s:?}, expected single, iterative-nearest or full-multi-goal"
            )),
        }
    }
}
