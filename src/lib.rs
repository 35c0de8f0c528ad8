//! # Threes Solver Library
//!
//! This library provides the game logic for a 4x4 Threes-style sliding puzzle
//! and a generic state-space search engine that plans a whole game ahead.
//!
//! It is used by three binaries:
//! - `human_player`: Allows interactive gameplay via the command line.
//! - `ai_solver`: Takes a seed (or a board file), an algorithm and a heuristic,
//!   plans a game and plays the plan back move by move.
//! - `heuristic_evaluator`: Benchmarks algorithm/heuristic combinations over a
//!   range of seeds.
//!
//! ## Modules
//! - `engine`: Moves, the board (`Board`), the seeded tile dealer, the searchable
//!   state (`ThreesState`) and the live session (`Game`).
//! - `model`: The `StateModel` contract the search engine is written against.
//! - `node`: Search-tree nodes in an arena, successor generation and path extraction.
//! - `frontier`: The open set (stack, queue or priority heap plus an open index)
//!   and the closed set.
//! - `solver`: DFS, BFS, greedy descent, the A* variants, and the `Solver` that
//!   hands out the resulting plan one move at a time.
//! - `heuristics`: The `Heuristic` trait and the built-in board evaluations.
//! - `bench`: Runs one (seed, algorithm, heuristic) combination and records the outcome.
//! - `utils`: Parsing boards from text.
//! - `error`: The crate error type.

pub mod bench;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod model;
pub mod node;
pub mod solver;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
