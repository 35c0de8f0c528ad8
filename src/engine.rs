//! Core game engine for the Threes-style puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Move`: The four slide directions, in the fixed clockwise order used by the search.
//! - `Board`: The square grid of tile values, with sliding, merging, scoring and
//!   terminal detection.
//! - `TileDealer`: The seeded random stream that decides where the pending tile
//!   lands and which tile comes next.
//! - `ThreesState`: Board + pending tile + dealer; the `StateModel` the search drives.
//! - `Game`: A live session around a `ThreesState` with step counting and undo.
use crate::error::{Error, Result};
use crate::model::StateModel;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One of the four slide directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    /// Every move in clockwise order starting from `Up`.
    ///
    /// Successors are generated in this order, so it is also the tie-break rule
    /// for otherwise equal choices.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    /// Row and column offset of a tile moving in this direction.
    fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Right => (0, 1),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
        }
    }

    /// Single-letter form used in move lists.
    ///
    /// # Examples
    ///
    /// ```
    /// use threes_solver::engine::Move;
    /// assert_eq!(Move::Up.to_char(), 'U');
    /// assert_eq!(Move::Left.to_char(), 'L');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Move::Up => 'U',
            Move::Right => 'R',
            Move::Down => 'D',
            Move::Left => 'L',
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = Error;

    /// Decodes the numeric move codes 0..=3 (clockwise from `Up`).
    fn try_from(code: u8) -> Result<Self> {
        Move::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| Error::InvalidMove {
                input: code.to_string(),
            })
    }
}

impl FromStr for Move {
    type Err = Error;

    /// Accepts direction names and the usual `w`/`d`/`s`/`a` keys, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" => Ok(Move::Up),
            "right" | "r" | "d" => Ok(Move::Right),
            "down" | "s" => Ok(Move::Down),
            "left" | "l" | "a" => Ok(Move::Left),
            _ => Err(Error::InvalidMove {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "UP",
            Move::Right => "RIGHT",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
        };
        f.write_str(name)
    }
}

/// Side length of the standard board.
pub const BOARD_SIZE: usize = 4;

/// Value of an empty cell.
pub const EMPTY: u32 = 0;

/// Returns whether a tile of value `a` may merge into a tile of value `b`.
///
/// A `1` and a `2` combine into a `3`; from `3` upwards only equal values combine.
pub fn can_merge(a: u32, b: u32) -> bool {
    match (a, b) {
        (1, 2) | (2, 1) => true,
        _ => a >= 3 && a == b,
    }
}

/// Points a single tile is worth.
///
/// `1` and `2` are worth nothing; a tile of value `3 * 2^k` is worth `3^(k + 1)`.
///
/// # Examples
/// ```
/// use threes_solver::engine::tile_score;
/// assert_eq!(tile_score(2), 0);
/// assert_eq!(tile_score(3), 3);
/// assert_eq!(tile_score(6), 9);
/// assert_eq!(tile_score(12), 27);
/// ```
pub fn tile_score(value: u32) -> u64 {
    if value < 3 {
        return 0;
    }
    let mut rank = 0;
    let mut rest = value / 3;
    while rest > 1 {
        rest >>= 1;
        rank += 1;
    }
    3u64.pow(rank + 1)
}

/// The game board: an `N` x `N` grid of tile values where `0` is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board<const N: usize = BOARD_SIZE> {
    grid: [[u32; N]; N],
}

impl<const N: usize> Board<N> {
    /// Creates a board with every cell empty.
    pub fn new_empty() -> Self {
        Board {
            grid: [[EMPTY; N]; N],
        }
    }

    /// Creates a board from a predefined grid.
    pub fn from_grid(grid: [[u32; N]; N]) -> Self {
        Board { grid }
    }

    /// Returns the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the board.
    pub fn get_tile(&self, r: usize, c: usize) -> u32 {
        self.grid[r][c]
    }

    /// Sets the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the board.
    pub fn set_tile(&mut self, r: usize, c: usize, value: u32) {
        self.grid[r][c] = value;
    }

    pub fn get_grid(&self) -> &[[u32; N]; N] {
        &self.grid
    }

    /// Iterates over every cell value in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = u32> + '_ {
        self.grid.iter().flatten().copied()
    }

    /// Coordinates of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for r in 0..N {
            for c in 0..N {
                if self.grid[r][c] == EMPTY {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    pub fn count_empty(&self) -> usize {
        self.tiles().filter(|&v| v == EMPTY).count()
    }

    pub fn count_occupied(&self) -> usize {
        N * N - self.count_empty()
    }

    /// Highest tile value, `0` for an empty board.
    pub fn max_tile(&self) -> u32 {
        self.tiles().max().unwrap_or(EMPTY)
    }

    /// Sum of `tile_score` over all tiles.
    pub fn score(&self) -> u64 {
        self.tiles().map(tile_score).sum()
    }

    /// Orthogonal neighbours of `(r, c)` that lie on the board.
    pub fn neighbours(&self, r: usize, c: usize) -> impl Iterator<Item = (usize, usize)> {
        Move::ALL.into_iter().filter_map(move |mv| {
            let (dr, dc) = mv.delta();
            let nr = r.checked_add_signed(dr)?;
            let nc = c.checked_add_signed(dc)?;
            (nr < N && nc < N).then_some((nr, nc))
        })
    }

    /// Slides every tile one cell in the direction of `mv`.
    ///
    /// Cells are processed starting from the edge the tiles move towards, so a
    /// whole line shifts by one when its leading cell is free. A tile moves into
    /// an empty neighbour, or merges into it when `can_merge` allows and that
    /// neighbour has not already absorbed a merge during this slide.
    ///
    /// # Returns
    /// `true` if any tile moved or merged.
    pub fn slide(&mut self, mv: Move) -> bool {
        let (dr, dc) = mv.delta();
        let mut merged = [[false; N]; N];
        let mut changed = false;

        for i in 0..N {
            for j in 0..N {
                let (r, c) = match mv {
                    Move::Up => (i, j),
                    Move::Down => (N - 1 - i, j),
                    Move::Left => (j, i),
                    Move::Right => (j, N - 1 - i),
                };
                let value = self.grid[r][c];
                if value == EMPTY {
                    continue;
                }
                let (Some(tr), Some(tc)) = (r.checked_add_signed(dr), c.checked_add_signed(dc))
                else {
                    continue;
                };
                if tr >= N || tc >= N {
                    continue;
                }

                let target = self.grid[tr][tc];
                if target == EMPTY {
                    self.grid[tr][tc] = value;
                    self.grid[r][c] = EMPTY;
                    changed = true;
                } else if can_merge(value, target) && !merged[tr][tc] {
                    self.grid[tr][tc] = value + target;
                    self.grid[r][c] = EMPTY;
                    merged[tr][tc] = true;
                    changed = true;
                }
            }
        }
        changed
    }

    /// True when some pair of orthogonally adjacent tiles could merge.
    pub fn has_mergeable_pair(&self) -> bool {
        for r in 0..N {
            for c in 0..N {
                let value = self.grid[r][c];
                if value == EMPTY {
                    continue;
                }
                if c + 1 < N && can_merge(value, self.grid[r][c + 1]) {
                    return true;
                }
                if r + 1 < N && can_merge(value, self.grid[r + 1][c]) {
                    return true;
                }
            }
        }
        false
    }

    /// True when no slide can change the board.
    ///
    /// Any tile next to an empty cell can slide into it, so a board is stuck
    /// exactly when it is full without a mergeable pair, or holds no tiles at all.
    pub fn is_stuck(&self) -> bool {
        let empty = self.count_empty();
        if empty == N * N {
            return true;
        }
        empty == 0 && !self.has_mergeable_pair()
    }
}

impl<const N: usize> Default for Board<N> {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl<const N: usize> fmt::Display for Board<N> {
    /// One row per line, values right-aligned, `.` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.grid.iter().enumerate() {
            for &value in row {
                if value == EMPTY {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{:>5}", value)?;
                }
            }
            if r + 1 < N {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// splitmix64 finaliser
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// The random stream that places new tiles.
///
/// The stream is keyed by the game seed and by the board it deals into, so a
/// cloned state deals exactly what the original would, and two states with the
/// same board and pending tile always deal the same way regardless of the path
/// that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileDealer {
    seed: u64,
}

impl TileDealer {
    pub fn new(seed: u64) -> Self {
        TileDealer { seed }
    }

    fn stream_for<const N: usize>(&self, board: &Board<N>, pending: u32) -> SmallRng {
        let key = board
            .tiles()
            .chain(std::iter::once(pending))
            .fold(mix(self.seed), |acc, value| mix(acc ^ u64::from(value)));
        SmallRng::seed_from_u64(key)
    }

    /// Drops `pending` into a random empty cell of `board` and draws the next
    /// pending tile (1, 2 or 3).
    ///
    /// A full board is left untouched; the next tile is still drawn.
    pub fn deal<const N: usize>(&self, board: &mut Board<N>, pending: u32) -> u32 {
        let mut rng = self.stream_for(board, pending);
        if let Some(&(r, c)) = board.empty_cells().choose(&mut rng) {
            board.set_tile(r, c, pending);
        }
        rng.gen_range(1..=3)
    }
}

/// A puzzle position: board, pending tile and the dealer that will place it.
///
/// Equality and hashing cover the board and the pending tile only. The dealer
/// is keyed by those two values (and a seed shared by every state of one game),
/// so equal states always have identical futures.
#[derive(Clone, Debug)]
pub struct ThreesState<const N: usize = BOARD_SIZE> {
    board: Board<N>,
    next_tile: u32,
    dealer: TileDealer,
}

impl<const N: usize> ThreesState<N> {
    /// Starts a game from `seed`: a `1` and a `2` on two distinct random cells.
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let cells: Vec<(usize, usize)> = (0..N).flat_map(|r| (0..N).map(move |c| (r, c))).collect();
        let mut board = Board::new_empty();
        for (&(r, c), value) in cells.choose_multiple(&mut rng, 2).zip([1, 2]) {
            board.set_tile(r, c, value);
        }
        ThreesState {
            board,
            next_tile: rng.gen_range(1..=3),
            dealer: TileDealer::new(seed),
        }
    }

    /// Starts a game from an explicit board; `seed` drives the pending tiles.
    pub fn from_board(board: Board<N>, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        ThreesState {
            board,
            next_tile: rng.gen_range(1..=3),
            dealer: TileDealer::new(seed),
        }
    }

    /// Replaces the pending tile.
    pub fn with_next_tile(mut self, tile: u32) -> Self {
        self.next_tile = tile;
        self
    }

    pub fn board(&self) -> &Board<N> {
        &self.board
    }

    /// Value of the tile the next successful move will place.
    pub fn next_tile(&self) -> u32 {
        self.next_tile
    }

    pub fn score(&self) -> u64 {
        self.board.score()
    }
}

impl<const N: usize> PartialEq for ThreesState<N> {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.next_tile == other.next_tile
    }
}

impl<const N: usize> Eq for ThreesState<N> {}

impl<const N: usize> Hash for ThreesState<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.next_tile.hash(state);
    }
}

impl<const N: usize> StateModel for ThreesState<N> {
    type Move = Move;

    const MOVES: &'static [Move] = &Move::ALL;

    /// Slides the board and, if anything moved, deals the pending tile.
    fn apply(&mut self, mv: Move) -> bool {
        if !self.board.slide(mv) {
            return false;
        }
        self.next_tile = self.dealer.deal(&mut self.board, self.next_tile);
        true
    }

    fn is_terminal(&self) -> bool {
        self.board.is_stuck()
    }

    /// Rank of `successor` among the successors of `self`, fullest board first.
    ///
    /// Equal empty-cell counts keep `Move::ALL` order. The first successor costs
    /// zero, so every non-terminal state has exactly one free edge and following
    /// free edges always ends on a stuck board.
    fn edge_cost(&self, successor: &Self) -> f64 {
        let mut options: Vec<(usize, Self)> = Move::ALL
            .iter()
            .filter_map(|&mv| {
                let mut next = self.clone();
                next.apply(mv).then(|| (next.board.count_empty(), next))
            })
            .collect();
        options.sort_by_key(|(empty, _)| *empty);
        let rank = options
            .iter()
            .position(|(_, next)| next == successor)
            .unwrap_or(options.len());
        rank as f64
    }
}

impl<const N: usize> fmt::Display for ThreesState<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "next: {}", self.next_tile)
    }
}

/// Manages a live game session: the current state, step count and an undo history.
///
/// # Examples
/// ```
/// use threes_solver::engine::{Game, Move};
/// let mut game: Game = Game::new(7);
/// if game.process_move(Move::Left) {
///     assert_eq!(game.steps(), 1);
///     assert!(game.undo_last_move());
/// }
/// assert_eq!(game.steps(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Game<const N: usize = BOARD_SIZE> {
    state: ThreesState<N>,
    steps: u32,
    history: Vec<ThreesState<N>>,
}

impl<const N: usize> Game<N> {
    /// Creates a new game from `seed` using `ThreesState::new`.
    pub fn new(seed: u64) -> Self {
        Self::from_state(ThreesState::new(seed))
    }

    pub fn from_state(state: ThreesState<N>) -> Self {
        Game {
            state,
            steps: 0,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &ThreesState<N> {
        &self.state
    }

    pub fn board(&self) -> &Board<N> {
        self.state.board()
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Applies `mv` to the live state.
    ///
    /// # Returns
    /// `false` (and no history entry) if the move changed nothing.
    pub fn process_move(&mut self, mv: Move) -> bool {
        let before = self.state.clone();
        if !self.state.apply(mv) {
            return false;
        }
        self.history.push(before);
        self.steps += 1;
        true
    }

    /// Restores the state before the last successful move.
    ///
    /// # Returns
    /// `false` if no move has been made.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.steps -= 1;
                true
            }
            None => false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }
}
