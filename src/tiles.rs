use std::{
    fmt::{Display, Write},
    ops::Index,
};

use crate::error::{Error, Result};
use crate::heuristic::manhattan_sum;
use crate::search::{SearchProblem, Successors};
use crate::Direction;

pub const SIDE: usize = 3;
const BLANK: u8 = 0;

// a pair sticks together by swapping places the moment it becomes adjacent
const STICKY_PAIRS: [(u8, u8); 2] = [(1, 3), (2, 4)];

/// A 3x3 sliding tile grid holding each of 0-8 exactly once, 0 is the blank.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct Tiles([u8; SIDE * SIDE]);

impl Tiles {
    pub fn new(rows: &[Vec<u8>]) -> Result<Tiles> {
        if rows.len() != SIDE || rows.iter().any(|row| row.len() != SIDE) {
            return Err(Error::PuzzleShape(rows.iter().map(Vec::len).collect()));
        }

        let mut cells = [BLANK; SIDE * SIDE];
        for (cell, value) in cells.iter_mut().zip(rows.iter().flatten()) {
            *cell = *value;
        }

        let mut seen = [false; SIDE * SIDE];
        for &value in &cells {
            match seen.get_mut(value as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(Error::NotPermutation(cells.to_vec())),
            }
        }

        Ok(Tiles(cells))
    }

    pub const fn goal() -> Tiles {
        Tiles([1, 2, 3, 4, 5, 6, 7, 8, 0])
    }

    /// Row and column of every value, indexed by value.
    pub fn positions(&self) -> [(usize, usize); SIDE * SIDE] {
        let mut result = [(0, 0); SIDE * SIDE];
        for (ix, &value) in self.0.iter().enumerate() {
            result[value as usize] = (ix / SIDE, ix % SIDE);
        }
        result
    }

    pub fn position(&self, value: u8) -> (usize, usize) {
        // NB: every value is present, see `new`
        let ix = self.0.iter().position(|&v| v == value).unwrap_or(0);
        (ix / SIDE, ix % SIDE)
    }

    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.0.chunks(SIDE).map(<[u8]>::to_vec).collect()
    }

    /// Row-major cells with the blank written as `_`, e.g. `45_813726`.
    pub fn flat(&self) -> String {
        self.0
            .iter()
            .map(|&v| if v == BLANK { '_' } else { (b'0' + v) as char })
            .collect()
    }

    pub fn adjacent(&self, a: u8, b: u8) -> bool {
        let (ai, aj) = self.position(a);
        let (bi, bj) = self.position(b);
        ai.abs_diff(bi) + aj.abs_diff(bj) == 1
    }

    fn swap_values(&mut self, a: u8, b: u8) {
        let (ai, aj) = self.position(a);
        let (bi, bj) = self.position(b);
        self.0.swap(ai * SIDE + aj, bi * SIDE + bj);
    }

    /// Slide the tile next to the blank in `direction`, without the sticky
    /// rule. `None` when no tile sits on that side of the blank.
    pub fn slide(&self, direction: Direction) -> Option<Tiles> {
        let (bi, bj) = self.position(BLANK);
        let (dx, dy) = direction.delta();
        // the blank travels against the tile
        let ni = bi as i32 - dy;
        let nj = bj as i32 - dx;
        if !(0..SIDE as i32).contains(&ni) || !(0..SIDE as i32).contains(&nj) {
            return None;
        }

        let mut next = *self;
        next.0.swap(bi * SIDE + bj, ni as usize * SIDE + nj as usize);
        Some(next)
    }

    /// One full move. The flag tells whether a sticky pair swapped.
    ///
    /// A pair swaps when it is adjacent after the slide but was not adjacent
    /// in `self`; both pairs are checked against `self`, not against each
    /// other's result.
    pub fn step(&self, direction: Direction, sticky: bool) -> Option<(Tiles, bool)> {
        let mut next = self.slide(direction)?;
        let mut swapped = false;
        if sticky {
            for (a, b) in STICKY_PAIRS {
                if next.adjacent(a, b) && !self.adjacent(a, b) {
                    next.swap_values(a, b);
                    swapped = true;
                }
            }
        }
        Some((next, swapped))
    }

    pub fn successors(&self, sticky: bool) -> Successors<Tiles, Direction> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.step(d, sticky).map(|(next, _)| (next, d)))
            .collect()
    }
}

impl Display for Tiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for line in self.0.chunks(SIDE) {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            for &v in line {
                f.write_char(if v == BLANK { '_' } else { (b'0' + v) as char })?;
            }
        }

        Ok(())
    }
}

impl Index<(usize, usize)> for Tiles {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index.0 * SIDE + index.1]
    }
}

/// Parse nested rows such as `[[4,5,0],[8,1,3],[7,2,6]]`.
pub fn parse_tiles(s: &str) -> Result<Tiles> {
    let rows: Vec<Vec<u8>> = serde_yaml::from_str(s)?;
    Tiles::new(&rows)
}

/// Replays `actions` from `start`, returning every intermediate grid with
/// its sticky-swap flag. `None` if an action is illegal where it is applied.
pub fn replay(start: Tiles, actions: &[Direction], sticky: bool) -> Option<Vec<(Tiles, bool)>> {
    let mut current = start;
    let mut result = Vec::with_capacity(actions.len());
    for &action in actions {
        let (next, swapped) = current.step(action, sticky)?;
        result.push((next, swapped));
        current = next;
    }
    Some(result)
}

/// Reach a fixed goal grid. Every move costs one.
#[derive(Clone, Debug)]
pub struct TilePuzzle {
    goal: Tiles,
    sticky_pairs: bool,
}

impl TilePuzzle {
    pub fn new(goal: Tiles, sticky_pairs: bool) -> TilePuzzle {
        TilePuzzle { goal, sticky_pairs }
    }

    pub fn goal(&self) -> Tiles {
        self.goal
    }

    pub fn sticky_pairs(&self) -> bool {
        self.sticky_pairs
    }
}

impl SearchProblem for TilePuzzle {
    type State = Tiles;
    type Move = Direction;

    fn is_goal(&self, state: &Tiles) -> bool {
        *state == self.goal
    }

    fn successors(&self, state: &Tiles) -> Successors<Tiles, Direction> {
        state.successors(self.sticky_pairs)
    }

    // NB: ignores the sticky swaps, which can shortcut the distance
    fn heuristic(&self, state: &Tiles) -> u32 {
        manhattan_sum(state, &self.goal)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::search::find;

    const SCENARIO: &str = "[[4,5,0],[8,1,3],[7,2,6]]";

    fn tiles(s: &str) -> Tiles {
        parse_tiles(s).unwrap()
    }

    #[test]
    fn parses_nested_rows() {
        let t = tiles(SCENARIO);
        assert_eq!(t.flat(), "45_813726");
        assert_eq!(t[(1, 2)], 3);
        assert_eq!(t.position(0), (0, 2));
        assert_eq!(t.to_string(), "45_\n813\n726");
        assert_eq!(t.rows(), vec![vec![4, 5, 0], vec![8, 1, 3], vec![7, 2, 6]]);
    }

    #[test]
    fn rejects_malformed_grids() {
        assert!(matches!(
            parse_tiles("[[1,2,3],[4,5,6]]"),
            Err(Error::PuzzleShape(_))
        ));
        assert!(matches!(
            parse_tiles("[[1,2,3],[4,5,6],[7,8]]"),
            Err(Error::PuzzleShape(_))
        ));
        assert!(matches!(
            parse_tiles("[[1,2,3],[4,5,6],[7,8,8]]"),
            Err(Error::NotPermutation(_))
        ));
        assert!(matches!(
            parse_tiles("[[1,2,3],[4,5,6],[7,8,9]]"),
            Err(Error::NotPermutation(_))
        ));
        assert!(matches!(parse_tiles("not a grid"), Err(Error::Yaml(_))));
    }

    #[test]
    fn slide_names_the_moving_tile() {
        let t = tiles(SCENARIO);
        // blank in the top right corner: nothing can slide left into it
        assert_eq!(t.slide(Direction::Left), None);
        assert_eq!(t.slide(Direction::Down), None);
        assert_eq!(t.slide(Direction::Right), Some(tiles("[[4,0,5],[8,1,3],[7,2,6]]")));
        assert_eq!(t.slide(Direction::Up), Some(tiles("[[4,5,3],[8,1,0],[7,2,6]]")));
    }

    #[test]
    fn corner_and_centre_successor_counts() {
        assert_eq!(tiles(SCENARIO).successors(true).len(), 2);
        assert_eq!(tiles("[[1,2,3],[4,0,5],[6,7,8]]").successors(true).len(), 4);
        assert_eq!(tiles("[[1,2,3],[0,4,5],[6,7,8]]").successors(false).len(), 3);
    }

    #[test]
    fn newly_adjacent_pair_swaps() {
        let t = tiles("[[1,0,3],[4,5,6],[7,8,2]]");
        let (next, swapped) = t.step(Direction::Left, true).unwrap();
        assert!(swapped);
        assert_eq!(next, tiles("[[3,1,0],[4,5,6],[7,8,2]]"));

        // without the rule the slide is all that happens
        let (plain, swapped) = t.step(Direction::Left, false).unwrap();
        assert!(!swapped);
        assert_eq!(plain, tiles("[[1,3,0],[4,5,6],[7,8,2]]"));
    }

    #[test]
    fn second_pair_swaps_too() {
        let t = tiles("[[2,0,4],[1,5,6],[7,8,3]]");
        let (next, swapped) = t.step(Direction::Right, true).unwrap();
        assert!(swapped);
        assert_eq!(next, tiles("[[0,4,2],[1,5,6],[7,8,3]]"));
    }

    #[test]
    fn already_adjacent_pair_stays() {
        let t = tiles("[[1,3,5],[4,0,6],[7,8,2]]");
        let (next, swapped) = t.step(Direction::Up, true).unwrap();
        assert!(!swapped);
        assert_eq!(next, tiles("[[1,3,5],[4,8,6],[7,0,2]]"));
    }

    #[test]
    fn scenario_replays_to_goal() {
        let start = tiles(SCENARIO);
        let puzzle = TilePuzzle::new(Tiles::goal(), true);
        let outcome = find(&puzzle, start, 0);

        assert!(outcome.success);
        assert_eq!(outcome.cost as usize, outcome.actions.len());

        let steps = replay(start, &outcome.actions, true).unwrap();
        assert_eq!(steps.last().map(|(t, _)| *t), Some(Tiles::goal()));
        let replayed: Vec<Tiles> = steps.iter().map(|(t, _)| *t).collect();
        assert_eq!(replayed[..], outcome.states[1..]);
    }

    #[test]
    fn replay_stops_on_illegal_move() {
        let start = tiles(SCENARIO);
        assert_eq!(replay(start, &[Direction::Right, Direction::Left, Direction::Left], true), None);
    }
}
