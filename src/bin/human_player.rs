use clap::Parser;
use std::io::{self, Write};
use threes_solver::engine::{Game, Move};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play the Threes puzzle in the terminal", long_about = None)]
struct Args {
    /// Seed for the starting board and the tile dealer
    #[clap(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("threes_solver=info")),
        )
        .init();

    let args = Args::parse();
    let mut game: Game = Game::new(args.seed);
    println!("Welcome to Threes!");

    loop {
        println!("---------------------");
        println!("Steps: {}, Score: {}", game.steps(), game.score());
        println!("{}", game.state());

        if game.is_game_over() {
            println!();
            println!("---------------------");
            println!("GAME OVER!");
            println!("Final Score: {}", game.score());
            println!("Total Steps: {}", game.steps());
            println!("---------------------");
            break;
        }

        print!("Enter your move (w/a/s/d or up/left/down/right), 'u' to undo, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let trimmed_input = input.trim();
        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "u" {
            if game.undo_last_move() {
                println!("Move undone.");
            } else {
                println!("Cannot undo further (no moves made).");
            }
            continue;
        }

        match trimmed_input.parse::<Move>() {
            Ok(mv) => {
                if game.process_move(mv) {
                    println!("Moved {}.", mv);
                } else {
                    println!("Nothing can slide {}.", mv);
                }
            }
            Err(e) => println!("{}", e),
        }
    }
}
