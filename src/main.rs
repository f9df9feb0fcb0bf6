use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use slider_maze_solver::baseline::shortest_cost;
use slider_maze_solver::maze::parse_maze;
use slider_maze_solver::report::{maze_step_table, tile_step_table, to_dot};
use slider_maze_solver::rle::compress_path;
use slider_maze_solver::search::{Outcome, TraceNode};
use slider_maze_solver::solver::collect_problem;
use slider_maze_solver::{
    parse_tiles, solve_maze, solve_tiles, Config, Direction, GoalMode, HeuristicKind, Result,
    TilePuzzle, Tiles,
};

#[derive(Parser, Debug)]
#[command(version, about = "Best-first solver for the sticky tile puzzle and the pearl maze")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Solve a 3x3 sliding tile grid.
    #[command(alias = "t")]
    Tiles(TilesArgs),

    /// Collect every target of a maze map.
    #[command(alias = "m")]
    Maze(MazeArgs),
}

#[derive(clap::Args, Debug)]
struct Common {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the heuristic of the configuration file.
    #[arg(long)]
    heuristic: Option<HeuristicKind>,
    /// Write the step table to this file.
    #[arg(long)]
    steps: Option<PathBuf>,
    /// Write the search trace as Graphviz DOT to this file.
    #[arg(long)]
    dot: Option<PathBuf>,
    /// Print the search result as JSON.
    #[arg(short, long, default_value_t = false)]
    json: bool,
    /// Compare the cost against an exhaustive breadth-first search.
    #[arg(long, default_value_t = false)]
    verify: bool,
}

#[derive(clap::Args, Debug)]
struct TilesArgs {
    /// Start grid as nested rows, 0 is the blank.
    #[arg(short, long)]
    grid: String,
    /// Goal grid, `[[1,2,3],[4,5,6],[7,8,0]]` when omitted.
    #[arg(long)]
    goal: Option<String>,
    #[command(flatten)]
    common: Common,
}

#[derive(clap::Args, Debug)]
struct MazeArgs {
    /// Map file made of `P`, `%`, `.`, `O` and spaces.
    map: PathBuf,
    /// Overrides the goal mode of the configuration file.
    #[arg(long)]
    goal_mode: Option<GoalMode>,
    #[command(flatten)]
    common: Common,
}

impl Common {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::read_yaml_file(path)?,
            None => Config::default(),
        };
        if let Some(heuristic) = self.heuristic {
            config.heuristic = Some(heuristic);
        }
        Ok(config)
    }

    fn print_outcome<S>(&self, outcome: &Outcome<S, Direction>) -> Result<()> {
        if outcome.success {
            println!("Found a solution in {} moves:", outcome.cost);
            println!("{}", compress_path(&outcome.actions));
        } else {
            println!("No solution found");
        }
        println!(
            "Expanded {} states (generated {} total, {} duplicates dropped).",
            outcome.stats.expanded, outcome.stats.generated, outcome.stats.suppressed
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome.result())?);
        }
        Ok(())
    }

    fn write_steps(&self, table: Option<String>) -> Result<()> {
        let Some(path) = &self.steps else {
            return Ok(());
        };
        match table {
            Some(table) => write_file(path, &table),
            None => {
                log::error!("the solution does not replay, no step table written");
                Ok(())
            }
        }
    }

    fn write_dot<S>(
        &self,
        trace: &[TraceNode<S, Direction>],
        label: impl Fn(&S) -> String,
    ) -> Result<()> {
        match &self.dot {
            Some(path) => write_file(path, &to_dot(trace, label)),
            None => Ok(()),
        }
    }

    fn report_baseline(&self, found: &Outcome<impl Sized, Direction>, optimum: Option<u32>) {
        match (found.success, optimum) {
            (true, Some(optimum)) if optimum == found.cost => {
                println!("Breadth-first search agrees: {} moves.", optimum)
            }
            (true, Some(optimum)) => {
                println!("Breadth-first search needs only {} moves.", optimum)
            }
            (false, None) => println!("Breadth-first search finds no solution either."),
            (_, Some(optimum)) => println!("Breadth-first search finds {} moves.", optimum),
            (true, None) => log::error!("breadth-first search disagrees: no solution"),
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

impl TilesArgs {
    fn run(self) -> Result<bool> {
        let config = self.common.load_config()?;
        let start = parse_tiles(&self.grid)?;
        let goal = match &self.goal {
            Some(goal) => parse_tiles(goal)?,
            None => Tiles::goal(),
        };

        println!("Start:\n{}\n----", start);
        println!("Goal:\n{}\n----", goal);

        let outcome = solve_tiles(start, goal, &config)?;
        self.common.print_outcome(&outcome)?;

        if outcome.success {
            self.common.write_steps(tile_step_table(
                start,
                &outcome.actions,
                config.sticky_pairs,
            ))?;
        }
        self.common.write_dot(&outcome.trace, |t: &Tiles| t.to_string())?;

        if self.common.verify {
            let puzzle = TilePuzzle::new(goal, config.sticky_pairs);
            self.common
                .report_baseline(&outcome, shortest_cost(&puzzle, &start));
        }
        Ok(outcome.success)
    }
}

impl MazeArgs {
    fn run(self) -> Result<bool> {
        let mut config = self.common.load_config()?;
        if let Some(goal_mode) = self.goal_mode {
            config.goal_mode = goal_mode;
        }

        let text = std::fs::read_to_string(&self.map)?;
        let (maze, start) = parse_maze(&text, &config)?;
        log::info!(
            "{}x{} maze, {} targets, goal mode {}",
            maze.width(),
            maze.height(),
            start.remaining(),
            config.goal_mode
        );
        println!("{}\n----", maze.render(&start));

        let outcome = solve_maze(&maze, start.clone(), &config)?;
        self.common.print_outcome(&outcome)?;

        if outcome.success {
            self.common.write_steps(maze_step_table(
                &maze,
                &start,
                &outcome.actions,
                config.points,
            ))?;
        }
        self.common.write_dot(&outcome.trace, |s| maze.render(s))?;

        if self.common.verify {
            let problem = collect_problem(&maze, &config)?;
            self.common
                .report_baseline(&outcome, shortest_cost(&problem, &start));
        }
        Ok(outcome.success)
    }
}

impl Command {
    fn run(self) -> Result<bool> {
        match self {
            Command::Tiles(args) => args.run(),
            Command::Maze(args) => args.run(),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}
