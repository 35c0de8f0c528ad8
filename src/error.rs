//! Error types for the solver crate.

use thiserror::Error;

/// Contract violations raised by the engine or the search drivers.
///
/// Running out of frontier is not an error; see `solver::SearchResult::Failure`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move '{input}' (expected one of up, right, down, left)")]
    InvalidMove { input: String },

    #[error("negative edge cost {cost} found at depth {depth}")]
    NegativeEdgeCost { cost: f64, depth: usize },

    #[error("invalid board: {message}")]
    InvalidBoard { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
