use crate::engine::{can_merge, Board, ThreesState, EMPTY};
use std::fmt;

/// Estimates the remaining cost (or value, for maximising searches) of a state.
///
/// Implementations must be pure and total: the same state always evaluates to
/// the same number and no reachable state may panic. Admissibility and
/// monotonicity are not required; the drivers accept any estimate, including
/// negative contributions.
pub trait Heuristic<S> {
    fn evaluate(&self, state: &S) -> f64;

    /// Short label used in logs and benchmark tables.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Always zero. Turns A* into uniform-cost (Dijkstra) search.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroHeuristic;

impl<S> Heuristic<S> for ZeroHeuristic {
    fn evaluate(&self, _state: &S) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "zero"
    }
}

/// Counts, over every tile, the orthogonal neighbours holding an equal value
/// and the empty neighbours.
///
/// # Returns
/// `(equal_neighbours, empty_neighbours)`; each adjacent pair is seen from both sides.
pub fn neighbour_counts<const N: usize>(board: &Board<N>) -> (u32, u32) {
    let mut equal = 0;
    let mut empty = 0;
    for r in 0..N {
        for c in 0..N {
            let value = board.get_tile(r, c);
            if value == EMPTY {
                continue;
            }
            for (nr, nc) in board.neighbours(r, c) {
                let other = board.get_tile(nr, nc);
                if other == value {
                    equal += 1;
                } else if other == EMPTY {
                    empty += 1;
                }
            }
        }
    }
    (equal, empty)
}

/// `-max_tile + empty_cells`: prefers open boards and, under minimisation, big tiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoreFreeCellsHighValue;

impl<const N: usize> Heuristic<ThreesState<N>> for MoreFreeCellsHighValue {
    fn evaluate(&self, state: &ThreesState<N>) -> f64 {
        let board = state.board();
        -(board.max_tile() as f64) + board.count_empty() as f64
    }

    fn name(&self) -> &'static str {
        "more-free-cells-high-value"
    }
}

/// `max_tile + 2 * empty_cells - low_tiles`, where low tiles are 1, 2 and 3.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxTileAndFreeCells;

impl<const N: usize> Heuristic<ThreesState<N>> for MaxTileAndFreeCells {
    fn evaluate(&self, state: &ThreesState<N>) -> f64 {
        let board = state.board();
        let low_tiles = board.tiles().filter(|v| (1..=3).contains(v)).count();
        board.max_tile() as f64 + 2.0 * board.count_empty() as f64 - low_tiles as f64
    }

    fn name(&self) -> &'static str {
        "max-tile-and-free-cells"
    }
}

/// Number of occupied cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinNonFreeCells;

impl<const N: usize> Heuristic<ThreesState<N>> for MinNonFreeCells {
    fn evaluate(&self, state: &ThreesState<N>) -> f64 {
        state.board().count_occupied() as f64
    }

    fn name(&self) -> &'static str {
        "min-non-free-cells"
    }
}

/// `-max_tile + empty_cells + 0.1 * (sum of values next to every max tile)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxValueAndAdjacent;

impl<const N: usize> Heuristic<ThreesState<N>> for MaxValueAndAdjacent {
    fn evaluate(&self, state: &ThreesState<N>) -> f64 {
        let board = state.board();
        let max_tile = board.max_tile();
        let mut adjacent_sum = 0u64;
        for r in 0..N {
            for c in 0..N {
                if board.get_tile(r, c) == max_tile {
                    adjacent_sum += board
                        .neighbours(r, c)
                        .map(|(nr, nc)| u64::from(board.get_tile(nr, nc)))
                        .sum::<u64>();
                }
            }
        }
        -(max_tile as f64) + board.count_empty() as f64 + 0.1 * adjacent_sum as f64
    }

    fn name(&self) -> &'static str {
        "max-value-and-adjacent"
    }
}

/// Rewards equal neighbours (combination potential) and empty neighbours
/// (mobility): `-max + empty + 2 * combos + mobility - 0.5 * (empty - combos)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxTilesCombinationPotential;

impl<const N: usize> Heuristic<ThreesState<N>> for MaxTilesCombinationPotential {
    fn evaluate(&self, state: &ThreesState<N>) -> f64 {
        let board = state.board();
        let (combos, mobility) = neighbour_counts(board);
        let empty = board.count_empty() as f64;
        let combos = combos as f64;
        -(board.max_tile() as f64) + empty + 2.0 * combos + mobility as f64
            - 0.5 * (empty - combos)
    }

    fn name(&self) -> &'static str {
        "max-tiles-combination-potential"
    }
}

/// Empty neighbours minus equal neighbours: the more fusions are lined up, the
/// lower the estimate.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxMoveCellsAndFusion;

impl<const N: usize> Heuristic<ThreesState<N>> for MaxMoveCellsAndFusion {
    fn evaluate(&self, state: &ThreesState<N>) -> f64 {
        let (fusions, moves_needed) = neighbour_counts(state.board());
        moves_needed as f64 - fusions as f64
    }

    fn name(&self) -> &'static str {
        "max-move-cells-and-fusion"
    }
}

/// `N * N - matches`, where a tile earns a match for each of:
/// - sitting on the border while able to merge with the pending tile (two on the diagonal);
/// - having a merge partner elsewhere in its row;
/// - having a merge partner elsewhere in its column.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberEquals;

impl<const N: usize> Heuristic<ThreesState<N>> for NumberEquals {
    fn evaluate(&self, state: &ThreesState<N>) -> f64 {
        let board = state.board();
        let next = state.next_tile();
        let mut matches = 0u32;

        for r in 0..N {
            for c in 0..N {
                let value = board.get_tile(r, c);
                if value == EMPTY {
                    continue;
                }
                let on_border = r == 0 || c == 0 || r == N - 1 || c == N - 1;
                if on_border && can_merge(next, value) {
                    matches += if r == c { 2 } else { 1 };
                }
                if (0..N).any(|k| k != c && can_merge(value, board.get_tile(r, k))) {
                    matches += 1;
                }
                if (0..N).any(|k| k != r && can_merge(value, board.get_tile(k, c))) {
                    matches += 1;
                }
            }
        }
        (N * N) as f64 - matches as f64
    }

    fn name(&self) -> &'static str {
        "number-equals"
    }
}

/// Runtime selector for the built-in heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum HeuristicKind {
    Zero,
    MoreFreeCellsHighValue,
    MaxTileAndFreeCells,
    MinNonFreeCells,
    MaxValueAndAdjacent,
    MaxTilesCombinationPotential,
    MaxMoveCellsAndFusion,
    NumberEquals,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 8] = [
        HeuristicKind::Zero,
        HeuristicKind::MoreFreeCellsHighValue,
        HeuristicKind::MaxTileAndFreeCells,
        HeuristicKind::MinNonFreeCells,
        HeuristicKind::MaxValueAndAdjacent,
        HeuristicKind::MaxTilesCombinationPotential,
        HeuristicKind::MaxMoveCellsAndFusion,
        HeuristicKind::NumberEquals,
    ];

    pub fn build<const N: usize>(self) -> Box<dyn Heuristic<ThreesState<N>>> {
        match self {
            HeuristicKind::Zero => Box::new(ZeroHeuristic),
            HeuristicKind::MoreFreeCellsHighValue => Box::new(MoreFreeCellsHighValue),
            HeuristicKind::MaxTileAndFreeCells => Box::new(MaxTileAndFreeCells),
            HeuristicKind::MinNonFreeCells => Box::new(MinNonFreeCells),
            HeuristicKind::MaxValueAndAdjacent => Box::new(MaxValueAndAdjacent),
            HeuristicKind::MaxTilesCombinationPotential => Box::new(MaxTilesCombinationPotential),
            HeuristicKind::MaxMoveCellsAndFusion => Box::new(MaxMoveCellsAndFusion),
            HeuristicKind::NumberEquals => Box::new(NumberEquals),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build::<4>().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    fn state(rows: &[&str], next: u32) -> ThreesState<4> {
        ThreesState::from_board(board_from_str_array(rows).unwrap(), 0).with_next_tile(next)
    }

    #[test]
    fn test_zero_heuristic() {
        let s = state(&["1 2"], 1);
        assert_eq!(ZeroHeuristic.evaluate(&s), 0.0);
    }

    #[test]
    fn test_neighbour_counts() {
        // 3 3 . .
        // 1 . . .
        let board: Board<4> = board_from_str_array(&["3 3 . .", "1 . . ."]).unwrap();
        let (equal, empty) = neighbour_counts(&board);
        assert_eq!(equal, 2); // the 3-3 pair from both sides
        assert_eq!(empty, 4); // (0,0): none, (0,1): right + down, (1,0): right + down
    }

    #[test]
    fn test_free_cell_heuristics() {
        let s = state(&["1 2 3 .", "6 . . .", ". . . .", ". . . ."], 2);
        assert_eq!(MoreFreeCellsHighValue.evaluate(&s), -6.0 + 12.0);
        assert_eq!(MaxTileAndFreeCells.evaluate(&s), 6.0 + 24.0 - 3.0);
        assert_eq!(MinNonFreeCells.evaluate(&s), 4.0);
    }

    #[test]
    fn test_max_value_and_adjacent() {
        let s = state(&["1 6 2 .", ". 3 . .", ". . . .", ". . . ."], 1);
        // neighbours of the 6: 1, 2, 3
        let expected = -6.0 + 12.0 + 0.1 * 6.0;
        assert!((MaxValueAndAdjacent.evaluate(&s) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_combination_heuristics() {
        let s = state(&["3 3 . .", "1 . . .", ". . . .", ". . . ."], 1);
        // combos = 2, mobility = 4, empty = 13, max = 3
        let expected = -3.0 + 13.0 + 4.0 + 4.0 - 0.5 * (13.0 - 2.0);
        assert!((MaxTilesCombinationPotential.evaluate(&s) - expected).abs() < 1e-9);
        assert_eq!(MaxMoveCellsAndFusion.evaluate(&s), 4.0 - 2.0);
    }

    #[test]
    fn test_number_equals() {
        // The 1 at (0,0) sits on the diagonal and merges with a pending 2: +2.
        // The 1 and 2 share row 0: +1 each. Nothing shares a column.
        let s = state(&["1 . 2 .", ". . . .", ". . . .", ". . . ."], 2);
        assert_eq!(NumberEquals.evaluate(&s), 16.0 - 4.0);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let s: ThreesState = ThreesState::new(3);
        for kind in HeuristicKind::ALL {
            let heuristic = kind.build::<4>();
            assert_eq!(heuristic.evaluate(&s), heuristic.evaluate(&s), "{}", kind);
        }
    }

    #[test]
    fn test_kind_names_are_distinct() {
        let mut names: Vec<String> = HeuristicKind::ALL.iter().map(|k| k.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), HeuristicKind::ALL.len());
    }
}
