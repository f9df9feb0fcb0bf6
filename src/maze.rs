use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use crate::config::{Config, PortalLayout};
use crate::error::{Error, Result};
use crate::heuristic::{nearest_target, TargetHeuristic};
use crate::search::{SearchProblem, Successors};
use crate::{Direction, Pos};

const AGENT: char = 'P';
const WALL: char = '%';
const PEARL: char = '.';
const GEM: char = 'O';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    /// Passable while power mode is active.
    pub ghostable: bool,
}

/// The part of a maze that never changes during a search.
#[derive(Clone, Debug)]
pub struct Maze {
    width: i32,
    height: i32,
    walls: HashMap<Pos, Wall>,
    portals: HashMap<Pos, Pos>,
    ghost_turns: u8,
    exit: Option<Pos>,
}

/// Search state of the agent. Equality and hashing cover exactly what
/// decides future moves, never the path that led here.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AgentState {
    pub agent: Pos,
    /// Low value targets.
    pub pearls: BTreeSet<Pos>,
    /// High value targets that also re-arm power mode.
    pub gems: BTreeSet<Pos>,
    /// Remaining moves of power mode.
    pub ghost_turns: u8,
}

impl AgentState {
    pub fn targets(&self) -> impl Iterator<Item = &Pos> {
        self.pearls.iter().chain(self.gems.iter())
    }

    pub fn remaining(&self) -> usize {
        self.pearls.len() + self.gems.len()
    }

    pub fn is_cleared(&self) -> bool {
        self.pearls.is_empty() && self.gems.is_empty()
    }
}

impl Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "P{} .{} O{} ghost {}",
            self.agent,
            self.pearls.len(),
            self.gems.len(),
            self.ghost_turns
        )
    }
}

#[auto_enums::auto_enum(Iterator)]
fn layout_links(layout: PortalLayout, width: i32, height: i32) -> impl Iterator<Item = (Pos, Pos)> {
    let corners = [
        Pos::new(1, 1),
        Pos::new(width - 2, 1),
        Pos::new(width - 2, height - 2),
        Pos::new(1, height - 2),
    ];
    match layout {
        PortalLayout::None => std::iter::empty::<(Pos, Pos)>(),
        PortalLayout::Opposite => (0..4).map(move |i| (corners[i], corners[(i + 2) % 4])),
        PortalLayout::Cycle => (0..4).map(move |i| (corners[i], corners[(i + 1) % 4])),
    }
}

/// Parse a map made of `P` (agent), `%` (wall), `.` (pearl), `O` (gem) and
/// spaces. Any other character is floor.
///
/// Walls on the outer ring of the map are solid, all others can be crossed
/// in power mode.
pub fn parse_maze(text: &str, config: &Config) -> Result<(Maze, AgentState)> {
    let rows: Vec<Vec<char>> = text
        .trim_matches(|c| c == '\n' || c == '\r')
        .lines()
        .map(|row| row.chars().collect())
        .collect();

    let expected = rows.first().map_or(0, Vec::len);
    if expected == 0 {
        return Err(Error::EmptyMap);
    }
    if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(Error::RaggedMap {
            row,
            len: cells.len(),
            expected,
        });
    }

    let width = expected as i32;
    let height = rows.len() as i32;
    let mut starts = Vec::new();
    let mut walls = HashMap::new();
    let mut pearls = BTreeSet::new();
    let mut gems = BTreeSet::new();

    for (y, row) in rows.iter().enumerate() {
        for (x, &c) in row.iter().enumerate() {
            let pos = Pos::new(x as i32, y as i32);
            match c {
                AGENT => starts.push(pos),
                WALL => {
                    let boundary =
                        pos.x == 0 || pos.y == 0 || pos.x == width - 1 || pos.y == height - 1;
                    walls.insert(pos, Wall { ghostable: !boundary });
                }
                PEARL => {
                    pearls.insert(pos);
                }
                GEM => {
                    gems.insert(pos);
                }
                _ => {}
            }
        }
    }

    let agent = match starts[..] {
        [agent] => agent,
        _ => return Err(Error::StartCount(starts.len())),
    };

    let mut maze = Maze {
        width,
        height,
        walls,
        portals: HashMap::new(),
        ghost_turns: config.ghost_turns,
        exit: None,
    };

    if config.portals != PortalLayout::None && (width < 4 || height < 4) {
        log::warn!(
            "a {}x{} map is too small for {:?} portals, ignoring them",
            width,
            height,
            config.portals
        );
    } else {
        maze.portals
            .extend(layout_links(config.portals, width, height));
    }
    for link in &config.portal_links {
        maze.check_bounds("portal", link.from)?;
        maze.check_bounds("portal exit", link.to)?;
        maze.portals.insert(link.from, link.to);
    }
    if let Some(exit) = config.exit {
        maze.check_bounds("exit", exit)?;
        maze.exit = Some(exit);
    }

    let start = AgentState {
        agent,
        pearls,
        gems,
        ghost_turns: 0,
    };
    Ok((maze, start))
}

impl Maze {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn exit(&self) -> Option<Pos> {
        self.exit
    }

    pub fn max_ghost_turns(&self) -> u8 {
        self.ghost_turns
    }

    pub fn contains(&self, pos: Pos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn wall(&self, pos: Pos) -> Option<Wall> {
        self.walls.get(&pos).copied()
    }

    pub fn portal(&self, pos: Pos) -> Option<Pos> {
        self.portals.get(&pos).copied()
    }

    fn check_bounds(&self, what: &'static str, pos: Pos) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                what,
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Where one step from `pos` ends, given the power turns left *before*
    /// the step. `None` if the move is blocked or leaves the agent in place.
    pub fn next_position(&self, pos: Pos, direction: Direction, ghost_turns: u8) -> Option<Pos> {
        let candidate = pos.step(direction);
        if !self.contains(candidate) {
            return None;
        }
        if let Some(wall) = self.wall(candidate) {
            if !wall.ghostable || ghost_turns == 0 {
                return None;
            }
        }

        let landed = self.portal(candidate).unwrap_or(candidate);
        (landed != pos).then_some(landed)
    }

    /// Apply one move: walk, tick power mode down, then consume whatever is
    /// on the landing cell. A gem re-arms power mode after the tick.
    pub fn step(&self, state: &AgentState, direction: Direction) -> Option<AgentState> {
        assert!(
            state.ghost_turns <= self.ghost_turns,
            "power mode counter {} exceeds its maximum {}",
            state.ghost_turns,
            self.ghost_turns
        );

        let agent = self.next_position(state.agent, direction, state.ghost_turns)?;
        let mut next = state.clone();
        next.agent = agent;
        next.ghost_turns = state.ghost_turns.saturating_sub(1);
        next.pearls.remove(&agent);
        if next.gems.remove(&agent) {
            next.ghost_turns = self.ghost_turns;
        }
        Some(next)
    }

    pub fn successors(&self, state: &AgentState) -> Successors<AgentState, Direction> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.step(state, d).map(|next| (next, d)))
            .collect()
    }

    /// Every state visited by `actions`, starting with `start`. `None` if an
    /// action is blocked where it is applied.
    pub fn replay(&self, start: &AgentState, actions: &[Direction]) -> Option<Vec<AgentState>> {
        let mut states = vec![start.clone()];
        for &action in actions {
            let next = self.step(states.last()?, action)?;
            states.push(next);
        }
        Some(states)
    }

    /// Draw the maze the way maps are written, with the state's agent and
    /// remaining targets.
    pub fn render(&self, state: &AgentState) -> String {
        let mut grid = vec![vec![' '; self.width as usize]; self.height as usize];
        let mut put = |pos: &Pos, c: char| grid[pos.y as usize][pos.x as usize] = c;
        for pos in self.walls.keys() {
            put(pos, WALL);
        }
        for pos in &state.pearls {
            put(pos, PEARL);
        }
        for pos in &state.gems {
            put(pos, GEM);
        }
        put(&state.agent, AGENT);

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Clear every target, and stand on the exit afterwards if one is given.
#[derive(Clone, Debug)]
pub struct CollectTargets<'a> {
    maze: &'a Maze,
    heuristic: TargetHeuristic,
    exit: Option<Pos>,
}

impl<'a> CollectTargets<'a> {
    pub fn new(maze: &'a Maze, heuristic: TargetHeuristic, exit: Option<Pos>) -> Self {
        CollectTargets {
            maze,
            heuristic,
            exit,
        }
    }
}

impl SearchProblem for CollectTargets<'_> {
    type State = AgentState;
    type Move = Direction;

    fn is_goal(&self, state: &AgentState) -> bool {
        state.is_cleared() && self.exit.map_or(true, |exit| state.agent == exit)
    }

    fn successors(&self, state: &AgentState) -> Successors<AgentState, Direction> {
        self.maze.successors(state)
    }

    // NB: portals can shortcut Manhattan distances
    fn heuristic(&self, state: &AgentState) -> u32 {
        self.heuristic.estimate(state.agent, state.targets())
    }
}

/// Consume any one target, used for the legs of the nearest-first strategy.
#[derive(Clone, Debug)]
pub struct ReachNearest<'a> {
    maze: &'a Maze,
    remaining: usize,
}

impl<'a> ReachNearest<'a> {
    pub fn new(maze: &'a Maze, start: &AgentState) -> Self {
        ReachNearest {
            maze,
            remaining: start.remaining(),
        }
    }
}

impl SearchProblem for ReachNearest<'_> {
    type State = AgentState;
    type Move = Direction;

    fn is_goal(&self, state: &AgentState) -> bool {
        state.remaining() < self.remaining
    }

    fn successors(&self, state: &AgentState) -> Successors<AgentState, Direction> {
        self.maze.successors(state)
    }

    fn heuristic(&self, state: &AgentState) -> u32 {
        nearest_target(state.agent, state.targets())
    }
}
