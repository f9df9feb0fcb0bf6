//! Exhaustive breadth-first reference, used to check what the best-first
//! engine returns.

use pathfinding::directed::bfs::bfs;

use crate::search::SearchProblem;

/// Shortest state sequence from `start` to a goal of `problem`, ignoring its
/// heuristic.
pub fn shortest<P: SearchProblem>(problem: &P, start: &P::State) -> Option<Vec<P::State>> {
    bfs(
        start,
        |s| problem.successors(s).into_iter().map(|(next, _)| next),
        |s| problem.is_goal(s),
    )
}

pub fn shortest_cost<P: SearchProblem>(problem: &P, start: &P::State) -> Option<u32> {
    shortest(problem, start).map(|path| (path.len() - 1) as u32)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Config, PortalLayout};
    use crate::heuristic::{mst_lower_bound, nearest_target, TargetHeuristic};
    use crate::maze::{parse_maze, CollectTargets};
    use crate::search::{find, Successors};
    use crate::tiles::{replay, TilePuzzle, Tiles};
    use crate::Direction;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    /// Same moves, no guidance: uniform cost search.
    struct Blind<P>(P);

    impl<P: SearchProblem> SearchProblem for Blind<P> {
        type State = P::State;
        type Move = P::Move;

        fn is_goal(&self, state: &Self::State) -> bool {
            self.0.is_goal(state)
        }

        fn successors(&self, state: &Self::State) -> Successors<Self::State, Self::Move> {
            self.0.successors(state)
        }

        fn heuristic(&self, _: &Self::State) -> u32 {
            0
        }
    }

    /// Random walk of at most `moves` legal moves away from the goal.
    fn scramble(rng: &mut StdRng, moves: usize, sticky: bool) -> Tiles {
        let mut tiles = Tiles::goal();
        for _ in 0..moves {
            let options = tiles.successors(sticky);
            if let Some((next, _)) = options.choose(rng) {
                tiles = *next;
            }
        }
        tiles
    }

    #[test]
    fn plain_puzzle_matches_breadth_first() {
        let puzzle = TilePuzzle::new(Tiles::goal(), false);
        let mut rng = StdRng::seed_from_u64(1);
        for round in 0..12 {
            let start = scramble(&mut rng, 1 + round % 8, false);
            let expected = shortest_cost(&puzzle, &start);
            assert!(expected.is_some(), "a scramble of the goal is solvable");

            let outcome = find(&puzzle, start, 0);
            assert!(outcome.success);
            assert_eq!(Some(outcome.cost), expected, "start {}", start.flat());
        }
    }

    #[test]
    fn sticky_puzzle_is_never_shorter_than_breadth_first() {
        let puzzle = TilePuzzle::new(Tiles::goal(), true);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..4 {
            let start = scramble(&mut rng, 6, true);
            let expected = shortest_cost(&puzzle, &start);

            let outcome = find(&puzzle, start, 0);
            assert_eq!(outcome.success, expected.is_some(), "start {}", start.flat());
            let Some(expected) = expected else { continue };

            // the heuristic ignores sticky swaps, so only a lower bound holds
            assert!(outcome.cost >= expected);
            let steps = replay(start, &outcome.actions, true).unwrap();
            assert_eq!(steps.last().map(|(t, _)| *t).unwrap_or(start), Tiles::goal());

            let blind = find(&Blind(&puzzle), start, 0);
            assert_eq!(blind.cost, expected);
        }
    }

    /// Open floor without border walls, `P` plus a few pearls.
    fn random_field(rng: &mut StdRng, width: usize, height: usize, pearls: usize) -> String {
        let mut cells = vec![' '; width * height];
        let mut order: Vec<usize> = (0..cells.len()).collect();
        order.shuffle(rng);
        cells[order[0]] = 'P';
        for &ix in &order[1..=pearls] {
            cells[ix] = '.';
        }
        cells
            .chunks(width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn target_estimates_never_overshoot() {
        let config = Config {
            portals: PortalLayout::None,
            ..Config::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..25 {
            let pearls = rng.gen_range(1..=4);
            let map = random_field(&mut rng, 4, 4, pearls);
            let (maze, start) = parse_maze(&map, &config).unwrap();

            let problem = CollectTargets::new(&maze, TargetHeuristic::SpanningTree, None);
            let optimal = shortest_cost(&problem, &start).unwrap();

            assert!(mst_lower_bound(start.agent, start.targets()) <= optimal, "{map}");
            assert!(nearest_target(start.agent, start.targets()) <= optimal, "{map}");

            let outcome = find(&problem, start.clone(), 0);
            assert!(outcome.success);
            assert!(outcome.cost >= optimal);
            let end = maze.replay(&start, &outcome.actions).unwrap();
            assert!(end.last().map_or(false, |s| s.is_cleared()));
        }
    }

    #[test]
    fn walled_paths_agree_on_reachability() {
        let config = Config {
            portals: PortalLayout::None,
            ..Config::default()
        };
        let (maze, start) = parse_maze("%%%%%\n%P%.%\n%%%%%", &config).unwrap();
        let problem = CollectTargets::new(&maze, TargetHeuristic::Nearest, None);

        assert_eq!(shortest_cost(&problem, &start), None);
        let outcome = find(&problem, start, 0);
        assert!(!outcome.success);
        assert!(outcome.actions.is_empty());
        assert_eq!(outcome.result().actions, Vec::<Direction>::new());
    }
}
