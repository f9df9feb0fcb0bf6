//! Generic best-first (A*) search over an implicitly generated graph.
//!
//! Every step costs one. A state is identified by its `Eq`/`Hash`
//! implementation, so problem types must only hash the fields that affect
//! future expansion.

use std::cell::Cell;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;
use std::ops::AddAssign;

use serde::Serialize;
use smallvec::SmallVec;

/// Successor buffer; no problem here has more than four moves per state.
pub type Successors<S, M> = SmallVec<[(S, M); 4]>;

pub trait SearchProblem {
    /// Canonical key of a search state. `Ord` is only used to break ties.
    type State: Clone + Eq + Hash + Ord;
    type Move: Copy;

    fn is_goal(&self, state: &Self::State) -> bool;

    fn successors(&self, state: &Self::State) -> Successors<Self::State, Self::Move>;

    /// Lower bound on the remaining number of moves.
    fn heuristic(&self, state: &Self::State) -> u32;
}

impl<P: SearchProblem + ?Sized> SearchProblem for &P {
    type State = P::State;
    type Move = P::Move;

    fn is_goal(&self, state: &Self::State) -> bool {
        (**self).is_goal(state)
    }

    fn successors(&self, state: &Self::State) -> Successors<Self::State, Self::Move> {
        (**self).successors(state)
    }

    fn heuristic(&self, state: &Self::State) -> u32 {
        (**self).heuristic(state)
    }
}

/// The externally visible result of one search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult<M> {
    pub cost: u32,
    pub actions: Vec<M>,
    pub success: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// States taken off the frontier and expanded.
    pub expanded: usize,
    /// Successors produced by the problem, duplicates included.
    pub generated: usize,
    /// Successors dropped because their key was already open or closed.
    pub suppressed: usize,
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Stats) {
        self.expanded += rhs.expanded;
        self.generated += rhs.generated;
        self.suppressed += rhs.suppressed;
    }
}

/// A node handed to visualizers: the state plus its parent linkage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceNode<S, M> {
    pub id: usize,
    pub parent: Option<usize>,
    pub action: Option<M>,
    pub depth: u32,
    pub state: S,
}

#[derive(Clone, Debug)]
pub struct Outcome<S, M> {
    pub success: bool,
    /// Number of moves on the path, zero on failure.
    pub cost: u32,
    pub actions: Vec<M>,
    /// Start state followed by the state after each action. Empty on failure.
    pub states: Vec<S>,
    pub stats: Stats,
    /// Expanded nodes shallower than the trace depth, plus the solution path.
    pub trace: Vec<TraceNode<S, M>>,
}

impl<S, M: Copy> Outcome<S, M> {
    pub fn result(&self) -> SearchResult<M> {
        SearchResult {
            cost: self.cost,
            actions: self.actions.clone(),
            success: self.success,
        }
    }

    pub fn last_state(&self) -> Option<&S> {
        self.states.last()
    }
}

struct Node<S, M> {
    state: S,
    parent: Option<usize>,
    action: Option<M>,
    g: u32,
    h: u32,
}

/// Frontier entry. Ordered by f, then g (shallower first), then the state
/// itself, then the arena index, which is the insertion order.
type Entry<S> = Reverse<(u32, u32, S, usize)>;

/// Run best-first search from `start` until a goal is popped or the frontier
/// is exhausted.
///
/// A successor whose key is already closed, or already waiting in the
/// frontier, is dropped even if it arrives by a cheaper path. With an
/// inconsistent heuristic this can return a longer path than necessary.
///
/// `trace_depth` only controls which expanded nodes are copied into
/// [`Outcome::trace`]; it never stops the search.
pub fn find<P: SearchProblem>(
    problem: &P,
    start: P::State,
    trace_depth: u32,
) -> Outcome<P::State, P::Move> {
    let mut nodes: Vec<Node<P::State, P::Move>> = Vec::new();
    let mut frontier: BinaryHeap<Entry<P::State>> = BinaryHeap::new();
    // kept in lockstep with `frontier`: every key in here has exactly one entry there
    let mut open: HashMap<P::State, usize> = HashMap::new();
    let mut closed: HashSet<P::State> = HashSet::new();
    let mut traced: Vec<usize> = Vec::new();
    let mut stats = Stats::default();

    let h = problem.heuristic(&start);
    log::debug!("search started, h(start) = {}", h);

    nodes.push(Node {
        state: start.clone(),
        parent: None,
        action: None,
        g: 0,
        h,
    });
    open.insert(start.clone(), 0);
    frontier.push(Reverse((h, 0, start, 0)));

    while let Some(Reverse((f, g, state, id))) = frontier.pop() {
        let indexed = open.remove(&state);
        assert_eq!(
            indexed,
            Some(id),
            "open index lost track of frontier node {}",
            id
        );
        debug_assert_eq!(f, nodes[id].g + nodes[id].h);

        if problem.is_goal(&state) {
            log::debug!(
                "goal reached at cost {} ({} expanded, {} generated, {} suppressed)",
                g,
                stats.expanded,
                stats.generated,
                stats.suppressed
            );
            return build_outcome(nodes, id, traced, stats);
        }

        assert!(
            closed.insert(state.clone()),
            "state of node {} was expanded twice",
            id
        );
        stats.expanded += 1;
        if g < trace_depth {
            traced.push(id);
        }
        log::trace!("expanding node {} with g = {}, f = {}", id, g, f);

        for (child, action) in problem.successors(&state) {
            stats.generated += 1;
            if closed.contains(&child) || open.contains_key(&child) {
                stats.suppressed += 1;
                continue;
            }

            let child_g = g + 1;
            let child_h = problem.heuristic(&child);
            let child_id = nodes.len();
            nodes.push(Node {
                state: child.clone(),
                parent: Some(id),
                action: Some(action),
                g: child_g,
                h: child_h,
            });
            open.insert(child.clone(), child_id);
            frontier.push(Reverse((child_g + child_h, child_g, child, child_id)));
        }
    }

    log::debug!(
        "frontier exhausted after {} expansions, no path",
        stats.expanded
    );
    let trace = collect_trace(&nodes, traced);
    Outcome {
        success: false,
        cost: 0,
        actions: Vec::new(),
        states: Vec::new(),
        stats,
        trace,
    }
}

fn build_outcome<S: Clone, M: Copy>(
    nodes: Vec<Node<S, M>>,
    goal: usize,
    mut traced: Vec<usize>,
    stats: Stats,
) -> Outcome<S, M> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(parent) = nodes[current].parent {
        path.push(parent);
        current = parent;
    }
    path.reverse();

    let actions = path.iter().filter_map(|&id| nodes[id].action).collect();
    let states = path.iter().map(|&id| nodes[id].state.clone()).collect();
    let cost = nodes[goal].g;
    debug_assert_eq!(cost as usize + 1, path.len());

    traced.extend_from_slice(&path);
    let trace = collect_trace(&nodes, traced);

    Outcome {
        success: true,
        cost,
        actions,
        states,
        stats,
        trace,
    }
}

fn collect_trace<S: Clone, M: Copy>(
    nodes: &[Node<S, M>],
    mut ids: Vec<usize>,
) -> Vec<TraceNode<S, M>> {
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter()
        .map(|id| {
            let node = &nodes[id];
            TraceNode {
                id,
                parent: node.parent,
                action: node.action,
                depth: node.g,
                state: node.state.clone(),
            }
        })
        .collect()
}

/// Caps the number of expansions of the wrapped problem.
///
/// Once the budget is spent every further expansion yields no successors, so
/// the engine drains its frontier and reports failure unless a goal was
/// already waiting in it.
pub struct Budgeted<P> {
    inner: P,
    limit: usize,
    spent: Cell<usize>,
}

impl<P> Budgeted<P> {
    pub fn new(inner: P, limit: usize) -> Budgeted<P> {
        Budgeted {
            inner,
            limit,
            spent: Cell::new(0),
        }
    }

    /// Whether at least one expansion was refused.
    pub fn exhausted(&self) -> bool {
        self.spent.get() > self.limit
    }
}

impl<P: SearchProblem> SearchProblem for Budgeted<P> {
    type State = P::State;
    type Move = P::Move;

    fn is_goal(&self, state: &Self::State) -> bool {
        self.inner.is_goal(state)
    }

    fn successors(&self, state: &Self::State) -> Successors<Self::State, Self::Move> {
        let spent = self.spent.get();
        self.spent.set(spent + 1);
        if spent >= self.limit {
            return Successors::new();
        }
        self.inner.successors(state)
    }

    fn heuristic(&self, state: &Self::State) -> u32 {
        self.inner.heuristic(state)
    }
}
