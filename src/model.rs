//! The contract between a puzzle and the search core.
//!
//! The drivers in `solver` never look inside a state. They only clone it,
//! apply moves to the clones, ask whether it is terminal, price the edge to a
//! successor, and use `Eq`/`Hash` to recognise states they have already seen.
use std::fmt::Debug;
use std::hash::Hash;

/// A single-agent puzzle state that the search engine can drive.
///
/// `Clone` must produce an independent copy, including whatever random stream
/// decides future tile placements, so that sibling branches never share it.
/// `Eq` and `Hash` define which states the search treats as duplicates.
pub trait StateModel: Clone + Eq + Hash + Debug {
    /// Move identifier. `MOVES` lists every move in the fixed order used for
    /// successor generation, which is also the tie-break order.
    type Move: Copy + Eq + Hash + Debug + 'static;

    const MOVES: &'static [Self::Move];

    /// Applies `mv` in place and reports whether anything changed.
    fn apply(&mut self, mv: Self::Move) -> bool;

    /// True when no move can change the state.
    fn is_terminal(&self) -> bool;

    /// Cost of the edge from `self` to `successor`, which must be a direct
    /// successor of `self`.
    fn edge_cost(&self, successor: &Self) -> f64;
}
