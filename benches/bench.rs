use criterion::{black_box, criterion_group, criterion_main, Criterion};

use slider_maze_solver::maze::parse_maze;
use slider_maze_solver::{
    parse_tiles, solve_maze, solve_tiles, Config, GoalMode, PortalLayout, Tiles,
};

const SCENARIO: &str = "[[4,5,0],[8,1,3],[7,2,6]]";

const SMALL_MAZE: &str = "
%%%%%%%%%%
%P   %  .%
% %% % % %
% .    % %
%%% %%O% %
%.       %
%%%%%%%%%%";

const SPREAD_MAZE: &str = "
%%%%%%%%%%%%
%.    %   .%
% %%% % %% %
%   P    O %
% %% %%%% %%
%.   .    .%
%%%%%%%%%%%%";

fn criterion_bench(c: &mut Criterion) {
    c.bench_function("tiles sticky", |b| {
        let start = parse_tiles(SCENARIO).unwrap();
        let config = Config::default();
        b.iter(|| solve_tiles(black_box(start), Tiles::goal(), &config))
    });

    c.bench_function("tiles plain", |b| {
        let start = parse_tiles(SCENARIO).unwrap();
        let config = Config {
            sticky_pairs: false,
            ..Config::default()
        };
        b.iter(|| solve_tiles(black_box(start), Tiles::goal(), &config))
    });

    for (name, map) in [("small", SMALL_MAZE), ("spread", SPREAD_MAZE)] {
        for mode in [GoalMode::FullMultiGoal, GoalMode::IterativeNearest] {
            let config = Config {
                goal_mode: mode,
                portals: PortalLayout::None,
                ..Config::default()
            };
            let (maze, start) = parse_maze(map, &config).unwrap();
            c.bench_function(&format!("maze {} {}", name, mode), |b| {
                b.iter(|| solve_maze(&maze, black_box(start.clone()), &config))
            });
        }
    }
}

criterion_group!(benches, criterion_bench);
criterion_main!(benches);
