//! Entry points that turn a [`Config`] into a concrete search.

use crate::config::{Config, GoalMode};
use crate::error::Result;
use crate::maze::{AgentState, CollectTargets, Maze, ReachNearest};
use crate::search::{find, Budgeted, Outcome, SearchProblem, Stats};
use crate::tiles::{TilePuzzle, Tiles};
use crate::Direction;

/// Run one search, capped by `max_expansions` when configured.
fn run<P: SearchProblem>(problem: &P, start: P::State, config: &Config) -> Outcome<P::State, P::Move> {
    match config.max_expansions {
        Some(limit) => {
            let budgeted = Budgeted::new(problem, limit);
            let outcome = find(&budgeted, start, config.trace_depth);
            if budgeted.exhausted() && !outcome.success {
                log::warn!("gave up after {} expansions", limit);
            }
            outcome
        }
        None => find(problem, start, config.trace_depth),
    }
}

pub fn solve_tiles(start: Tiles, goal: Tiles, config: &Config) -> Result<Outcome<Tiles, Direction>> {
    config.check_tiles()?;
    let puzzle = TilePuzzle::new(goal, config.sticky_pairs);
    Ok(run(&puzzle, start, config))
}

/// Whole-maze search under the configured heuristic. The exit only counts in
/// single mode.
pub fn collect_problem<'a>(maze: &'a Maze, config: &Config) -> Result<CollectTargets<'a>> {
    let heuristic = config.target_heuristic()?;
    let exit = match config.goal_mode {
        GoalMode::Single => maze.exit(),
        GoalMode::IterativeNearest | GoalMode::FullMultiGoal => None,
    };
    Ok(CollectTargets::new(maze, heuristic, exit))
}

pub fn solve_maze(
    maze: &Maze,
    start: AgentState,
    config: &Config,
) -> Result<Outcome<AgentState, Direction>> {
    let problem = collect_problem(maze, config)?;
    match config.goal_mode {
        GoalMode::Single | GoalMode::FullMultiGoal => Ok(run(&problem, start, config)),
        GoalMode::IterativeNearest => Ok(nearest_first(maze, start, config)),
    }
}

/// Greedy chain of searches, each to whichever remaining target is cheapest
/// to reach. Not optimal overall. Traces of the legs are not kept.
fn nearest_first(maze: &Maze, start: AgentState, config: &Config) -> Outcome<AgentState, Direction> {
    let mut stats = Stats::default();
    let mut actions = Vec::new();
    let mut states = vec![start.clone()];
    let mut current = start;
    let mut legs = 0;

    while !current.is_cleared() {
        legs += 1;
        let leg = ReachNearest::new(maze, &current);
        let outcome = run(&leg, current.clone(), config);
        stats += outcome.stats;

        let Some(reached) = outcome.last_state().cloned() else {
            log::info!(
                "no path to any of the {} remaining targets",
                current.remaining()
            );
            return Outcome {
                success: false,
                cost: 0,
                actions: Vec::new(),
                states: Vec::new(),
                stats,
                trace: Vec::new(),
            };
        };

        log::info!(
            "leg {}: {} moves to {}, {} targets left",
            legs,
            outcome.cost,
            reached.agent,
            reached.remaining()
        );
        actions.extend(outcome.actions);
        states.extend(outcome.states.into_iter().skip(1));
        current = reached;
    }

    Outcome {
        success: true,
        cost: actions.len() as u32,
        actions,
        states,
        stats,
        trace: Vec::new(),
    }
}
