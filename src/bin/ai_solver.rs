use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use threes_solver::engine::{Game, ThreesState};
use threes_solver::error::{Error, Result};
use threes_solver::heuristics::HeuristicKind;
use threes_solver::solver::{Algorithm, SearchConfig, SearchResult, Solver, DEFAULT_MAX_EXPANSIONS};
use threes_solver::utils::board_from_text;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Plans a Threes game with a search algorithm and plays it back", long_about = None)]
struct Args {
    /// Seed for the starting board and the tile dealer
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Search algorithm
    #[clap(short, long, value_enum, default_value_t = Algorithm::AStarMax)]
    algorithm: Algorithm,

    /// Heuristic used by greedy and the A* variants
    #[clap(short = 'H', long, value_enum, default_value_t = HeuristicKind::Zero)]
    heuristic: HeuristicKind,

    /// Maximum number of node expansions
    #[clap(short, long, default_value_t = DEFAULT_MAX_EXPANSIONS)]
    max_expansions: usize,

    /// Delay between played moves, in milliseconds
    #[clap(short, long, default_value_t = 250)]
    delay_ms: u64,

    /// Skip search progress logs and board printing
    #[clap(long)]
    headless: bool,

    /// Optional 4x4 board file (rows of whitespace-separated values, `.` for empty)
    board_file: Option<PathBuf>,
}

fn read_board_file(path: &Path, seed: u64) -> Result<ThreesState> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        operation: format!("read board file {}", path.display()),
        source,
    })?;
    Ok(ThreesState::from_board(board_from_text(&content)?, seed))
}

fn run(args: &Args) -> Result<()> {
    let initial = match &args.board_file {
        Some(path) => {
            let state = read_board_file(path, args.seed)?;
            println!("Loaded board from {}\n", path.display());
            state
        }
        None => ThreesState::new(args.seed),
    };
    println!("Initial state:\n{}\n", initial);
    println!(
        "Searching with {} / {} (budget {} expansions)...\n",
        args.algorithm, args.heuristic, args.max_expansions
    );

    let config = SearchConfig {
        headless: args.headless,
        max_expansions: Some(args.max_expansions),
    };
    let heuristic = args.heuristic.build::<4>();
    let mut solver = Solver::new(args.algorithm, initial.clone(), heuristic.as_ref(), &config)?;
    let stats = *solver.stats();
    println!(
        "Opened: {}, Closed: {}, Max depth: {}",
        stats.opened, stats.closed, stats.max_depth
    );
    match solver.result() {
        SearchResult::Failure(reason) => {
            println!("No further AI move available ({}).", reason);
            return Ok(());
        }
        SearchResult::Success(solution) => {
            let plan: String = solution.moves.iter().map(|mv| mv.to_char()).collect();
            println!("Plan ({} moves, cost {}): {}\n", solution.moves.len(), solution.cost(), plan);
        }
    }

    let mut game = Game::from_state(initial);
    let delay = Duration::from_millis(args.delay_ms);
    while let Some(mv) = solver.get_next_move() {
        if !game.process_move(mv) {
            println!("Planned move {} did not change the board; stopping.", mv);
            break;
        }
        if !args.headless {
            println!("Move {}: {}", game.steps(), mv);
            println!("{}\nScore: {}\n", game.state(), game.score());
        }
        thread::sleep(delay);
    }

    println!("Moves played: {}", game.steps());
    println!("Final score: {}", game.score());
    println!("Final board:\n{}", game.board());
    if !game.is_game_over() {
        println!("The board can still move.");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("threes_solver=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
