use crate::engine::{Board, EMPTY};
use crate::error::{Error, Result};

/// Parses an array of string slices into a `Board`.
///
/// Each string slice is one row, starting from row 0, holding whitespace-separated
/// tokens: a positive tile value, or `.` / `0` for an empty cell. Missing rows and
/// missing trailing cells are left empty.
///
/// # Returns
/// * `Ok(Board)` if parsing is successful.
/// * `Err(Error::InvalidBoard)` if there are more than `N` rows, a row holds more than
///   `N` tokens, or a token is not a tile value.
///
/// # Examples
/// ```
/// use threes_solver::engine::Board;
/// use threes_solver::utils::board_from_str_array;
///
/// let board: Board<4> = board_from_str_array(&["1 . 3", ". 12"]).unwrap();
/// assert_eq!(board.get_tile(0, 0), 1);
/// assert_eq!(board.get_tile(0, 2), 3);
/// assert_eq!(board.get_tile(0, 3), 0);
/// assert_eq!(board.get_tile(1, 1), 12);
///
/// assert!(board_from_str_array::<4>(&["1 x"]).is_err());
/// ```
pub fn board_from_str_array<const N: usize>(s: &[&str]) -> Result<Board<N>> {
    if s.len() > N {
        return Err(Error::InvalidBoard {
            message: format!("expected at most {} rows, found {}", N, s.len()),
        });
    }

    let mut grid = [[EMPTY; N]; N];
    for (r, row_str) in s.iter().enumerate() {
        let tokens: Vec<&str> = row_str.split_whitespace().collect();
        if tokens.len() > N {
            return Err(Error::InvalidBoard {
                message: format!(
                    "row {} is too long: expected at most {} cells, found {}",
                    r,
                    N,
                    tokens.len()
                ),
            });
        }

        for (c, token) in tokens.iter().enumerate() {
            grid[r][c] = match *token {
                "." => EMPTY,
                _ => token.parse::<u32>().map_err(|_| Error::InvalidBoard {
                    message: format!("unrecognized cell '{}' in row {} col {}", token, r, c),
                })?,
            };
        }
    }
    Ok(Board::from_grid(grid))
}

/// Parses a whole board file: blank lines are skipped and exactly `N` rows are
/// required.
pub fn board_from_text<const N: usize>(text: &str) -> Result<Board<N>> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if rows.len() != N {
        return Err(Error::InvalidBoard {
            message: format!("expected {} rows, found {}", N, rows.len()),
        });
    }
    board_from_str_array(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_array_valid() {
        let board: Board<4> =
            board_from_str_array(&["1 2 3 6", ". . . .", "0 12 . 1", "24 . . 2"]).unwrap();
        assert_eq!(board.get_tile(0, 3), 6);
        assert_eq!(board.get_tile(1, 0), EMPTY);
        assert_eq!(board.get_tile(2, 0), EMPTY);
        assert_eq!(board.get_tile(2, 1), 12);
        assert_eq!(board.get_tile(3, 0), 24);
    }

    #[test]
    fn test_board_from_str_array_invalid_token() {
        let result = board_from_str_array::<4>(&["1 2 X"]);
        match result {
            Err(Error::InvalidBoard { message }) => {
                assert!(message.contains("unrecognized cell 'X'"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_board_from_str_array_row_too_long() {
        let result = board_from_str_array::<3>(&["1 2 3 1"]);
        assert!(matches!(result, Err(Error::InvalidBoard { message }) if message.contains("row 0 is too long")));
    }

    #[test]
    fn test_board_from_str_array_too_many_rows() {
        let result = board_from_str_array::<2>(&["1", "2", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        let board: Board<4> = board_from_str_array(&[]).unwrap();
        assert_eq!(board, Board::new_empty());
    }

    #[test]
    fn test_board_from_text_requires_every_row() {
        let board: Board<2> = board_from_text("1 2\n\n  3 .  \n").unwrap();
        assert_eq!(board.get_tile(1, 0), 3);
        assert!(board_from_text::<2>("1 2\n").is_err());
    }
}
