//! Sliding-Block Puzzle Solver
//!
//! Reads a puzzle in the grid text format, runs depth-first or A*
//! search until the 2x2 goal block reaches the bottom-center target
//! region, and writes the board sequence from start to goal.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use klotski::pieces::Coord;
use klotski::solver::{Algorithm, SearchOutcome};
use klotski::{persistence, solver, Board};

/// Solves sliding-block puzzles in the grid text format.
#[derive(Parser)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and write the board sequence from start to goal.
    Solve {
        /// Puzzle file in the grid text format.
        input: PathBuf,
        /// Write the solution frames here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Search strategy.
        #[arg(long, value_enum, default_value = "astar")]
        algo: Algo,
    },
    /// Parse a puzzle file and display the starting board.
    Show {
        /// Puzzle file in the grid text format.
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Algo {
    /// Uninformed depth-first search.
    Dfs,
    /// A* with the Manhattan-distance heuristic.
    Astar,
}

impl From<Algo> for Algorithm {
    fn from(algo: Algo) -> Self {
        match algo {
            Algo::Dfs => Algorithm::DepthFirst,
            Algo::Astar => Algorithm::AStar,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            input,
            output,
            algo,
        } => run_solve(&input, output.as_deref(), algo.into()),
        Command::Show { input } => run_show(&input),
    }
}

/// Reads and parses a puzzle file.
fn load_board(input: &Path) -> Result<Board, String> {
    let text = fs::read_to_string(input)
        .map_err(|err| format!("failed to read {}: {}", input.display(), err))?;
    persistence::parse_board(&text)
        .map_err(|err| format!("invalid puzzle {}: {}", input.display(), err))
}

/// Bottom-center 2x2 region, the classic exit position.
fn target_anchor(board: &Board) -> Coord {
    ((board.width() - 2) / 2, board.height() - 2)
}

fn run_solve(input: &Path, output: Option<&Path>, algorithm: Algorithm) -> ExitCode {
    let board = match load_board(input) {
        Ok(board) => board,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let target = target_anchor(&board);
    log::info!("searching with {algorithm:?}, target anchor {target:?}");

    let start = Instant::now();
    let outcome = solver::solve(board, target, algorithm);
    let elapsed = start.elapsed().as_secs_f64();

    match outcome {
        SearchOutcome::Solved { path, stats } => {
            println!(
                "Solved in {} moves ({} states expanded, {:.3}s)",
                path.len() - 1,
                stats.nodes_expanded,
                elapsed
            );
            match output {
                Some(file) => {
                    if let Err(err) = persistence::save_path(file, &path) {
                        eprintln!("failed to write {}: {}", file.display(), err);
                        return ExitCode::FAILURE;
                    }
                    println!("Wrote {}", file.display());
                }
                None => print!("{}", persistence::format_path(&path)),
            }
            ExitCode::SUCCESS
        }
        SearchOutcome::Exhausted { stats } => {
            println!(
                "No solution ({} states expanded, {:.3}s)",
                stats.nodes_expanded, elapsed
            );
            ExitCode::FAILURE
        }
    }
}

fn run_show(input: &Path) -> ExitCode {
    match load_board(input) {
        Ok(board) => {
            print!("{board}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The classic Hua Rong Dao starting layout.
    const CLASSIC_BOARD: &str = "\
^11^
v11v
^<>^
v22v
2..2
";

    #[test]
    fn test_classic_board_snapshot() {
        let board = persistence::parse_board(CLASSIC_BOARD).unwrap();
        insta::assert_snapshot!("classic_start", board.render());
    }

    #[test]
    fn test_target_anchor_is_bottom_center() {
        let board = persistence::parse_board(CLASSIC_BOARD).unwrap();
        assert_eq!(target_anchor(&board), (1, 3));
    }

    #[test]
    fn test_classic_board_solves_to_target() {
        let board = persistence::parse_board(CLASSIC_BOARD).unwrap();
        let target = target_anchor(&board);
        let outcome = solver::solve(board, target, Algorithm::AStar);
        let path = outcome.path().expect("the classic layout is solvable");
        assert!(path.last().unwrap().goal_reached(target));
    }
}
