use clap::Parser;
use std::collections::HashMap;
use threes_solver::bench::{run_benchmark, BenchmarkRecord};
use threes_solver::heuristics::HeuristicKind;
use threes_solver::solver::{Algorithm, SearchConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Benchmarks search algorithms and heuristics over a range of seeds", long_about = None)]
struct Args {
    /// Number of seeds to evaluate
    #[clap(short, long, default_value_t = 10)]
    boards: u64,

    /// First seed
    #[clap(short, long, default_value_t = 0)]
    start_seed: u64,

    /// Algorithms to run (all if omitted)
    #[clap(short, long, value_enum, num_args = 1..)]
    algorithms: Vec<Algorithm>,

    /// Heuristics to run with greedy and the A* variants (all if omitted)
    #[clap(short = 'H', long, value_enum, num_args = 1..)]
    heuristics: Vec<HeuristicKind>,

    /// Maximum number of node expansions per search
    #[clap(short, long, default_value_t = 20_000)]
    max_expansions: usize,
}

/// DFS, BFS and depth-discounted A* ignore the heuristic, so they run once with
/// the zero heuristic.
fn combinations(algorithms: &[Algorithm], heuristics: &[HeuristicKind]) -> Vec<(Algorithm, HeuristicKind)> {
    let mut combos = Vec::new();
    for &algorithm in algorithms {
        match algorithm {
            Algorithm::DepthFirst | Algorithm::BreadthFirst | Algorithm::AStarDepthDiscounted => {
                combos.push((algorithm, HeuristicKind::Zero))
            }
            _ => combos.extend(heuristics.iter().map(|&h| (algorithm, h))),
        }
    }
    combos
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("threes_solver=warn")),
        )
        .init();

    let args = Args::parse();
    let algorithms = if args.algorithms.is_empty() {
        Algorithm::ALL.to_vec()
    } else {
        args.algorithms.clone()
    };
    let heuristics = if args.heuristics.is_empty() {
        HeuristicKind::ALL.to_vec()
    } else {
        args.heuristics.clone()
    };
    let combos = combinations(&algorithms, &heuristics);
    let config = SearchConfig {
        headless: true,
        max_expansions: Some(args.max_expansions),
    };

    println!(
        "Starting evaluation of {} combinations on {} boards...",
        combos.len(),
        args.boards
    );

    let mut records: HashMap<(Algorithm, HeuristicKind), Vec<BenchmarkRecord>> = HashMap::new();
    for seed in args.start_seed..args.start_seed + args.boards {
        println!("\nBoard seed {}", seed);
        for &(algorithm, heuristic) in &combos {
            match run_benchmark(seed, algorithm, heuristic, &config) {
                Ok(record) => {
                    println!(
                        "  {:<16} {:<32} solved: {:<5} score: {:<6} time: {:>8.3}s opened: {:<7} closed: {:<7} depth: {}",
                        algorithm.as_str(),
                        heuristic.to_string(),
                        record.solved,
                        record.final_score,
                        record.elapsed.as_secs_f64(),
                        record.opened,
                        record.closed,
                        record.max_depth
                    );
                    records.entry((algorithm, heuristic)).or_default().push(record);
                }
                Err(e) => eprintln!("  {:<16} {:<32} error: {}", algorithm.as_str(), heuristic.to_string(), e),
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Averages ---");

    let mut averages: Vec<(Algorithm, HeuristicKind, f64, f64, usize)> = Vec::new();
    for &(algorithm, heuristic) in &combos {
        let Some(runs) = records.get(&(algorithm, heuristic)) else {
            println!("{} / {}: no runs recorded.", algorithm, heuristic);
            continue;
        };
        let count = runs.len() as f64;
        let avg_score = runs.iter().map(|r| r.final_score as f64).sum::<f64>() / count;
        let avg_secs = runs.iter().map(|r| r.elapsed.as_secs_f64()).sum::<f64>() / count;
        let solved = runs.iter().filter(|r| r.solved).count();
        averages.push((algorithm, heuristic, avg_score, avg_secs, solved));
    }

    // Sort by average score descending
    averages.sort_by(|a, b| b.2.total_cmp(&a.2));

    for (algorithm, heuristic, avg_score, avg_secs, solved) in averages {
        println!(
            "{:<16} {:<32}: Average Score = {:>9.2}, Average Time = {:.3}s, Solved = {}/{}",
            algorithm.as_str(),
            heuristic.to_string(),
            avg_score,
            avg_secs,
            solved,
            args.boards
        );
    }
}
