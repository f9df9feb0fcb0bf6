//! Admissible distance estimates for both puzzles.

use itertools::Itertools;

use crate::tiles::Tiles;
use crate::Pos;

/// Sum over tiles 1-8 of the Manhattan distance to their goal cell.
pub fn manhattan_sum(tiles: &Tiles, goal: &Tiles) -> u32 {
    tiles
        .positions()
        .iter()
        .zip_eq(goal.positions().iter())
        .skip(1) // the blank does not count
        .map(|(&(i, j), &(gi, gj))| (i.abs_diff(gi) + j.abs_diff(gj)) as u32)
        .sum()
}

/// Distance from the agent to the closest target, 0 without targets.
pub fn nearest_target<'a>(agent: Pos, targets: impl IntoIterator<Item = &'a Pos>) -> u32 {
    targets
        .into_iter()
        .map(|t| agent.manhattan(*t))
        .min()
        .unwrap_or(0)
}

/// Weight of a minimum spanning tree over the agent and all targets, with
/// Manhattan distance as edge weight. Any walk that visits every target is at
/// least this long.
pub fn mst_lower_bound<'a>(agent: Pos, targets: impl IntoIterator<Item = &'a Pos>) -> u32 {
    let mut pending: Vec<Pos> = targets.into_iter().copied().collect();
    // cheapest edge from the tree grown so far to each pending node
    let mut best: Vec<u32> = pending.iter().map(|p| agent.manhattan(*p)).collect();
    let mut total = 0;

    while let Some(ix) = best.iter().position_min() {
        total += best.swap_remove(ix);
        let joined = pending.swap_remove(ix);
        for (p, d) in pending.iter().zip(best.iter_mut()) {
            *d = (*d).min(joined.manhattan(*p));
        }
    }

    total
}

/// The multi-target estimators, selectable per search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetHeuristic {
    Nearest,
    SpanningTree,
}

impl TargetHeuristic {
    pub fn estimate<'a>(self, agent: Pos, targets: impl IntoIterator<Item = &'a Pos>) -> u32 {
        match self {
            TargetHeuristic::Nearest => nearest_target(agent, targets),
            TargetHeuristic::SpanningTree => mst_lower_bound(agent, targets),
        }
    }
}
