//! Core domain types for tic-tac-toe.

use super::position::Position;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::instrument;

/// Player mark in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns the single-character symbol for this mark.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from raw squares in row-major order.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Gets the square at a raw index, `None` when out of bounds.
    pub fn square(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn filled(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// The player whose turn it is, derived from move-count parity.
    ///
    /// X always moves first, so an even number of marks means X is next.
    pub fn next_player(&self) -> Player {
        if self.filled() % 2 == 0 {
            Player::X
        } else {
            Player::O
        }
    }

    /// The lowest-index empty position, if any.
    pub fn first_empty(&self) -> Option<Position> {
        Position::iter().find(|pos| self.is_empty(*pos))
    }

    /// Formats the board as a human-readable grid, empty squares numbered 1-9.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(p) => p.symbol().to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }

    /// Compact nine-character form, `-` for empty squares.
    pub fn compact(&self) -> String {
        self.squares
            .iter()
            .map(|s| match s {
                Square::Empty => '-',
                Square::Occupied(p) => p.symbol(),
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.compact())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parses nine cells: `X`/`O` (any case) for marks, and `-`, `_`, `.`
    /// or a digit for empty squares. Whitespace, `|` and `,` are ignored.
    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = [Square::Empty; 9];
        let mut count = 0;
        for c in s.chars() {
            let square = match c {
                'X' | 'x' => Square::Occupied(Player::X),
                'O' | 'o' => Square::Occupied(Player::O),
                '-' | '_' | '.' => Square::Empty,
                c if c.is_ascii_digit() => Square::Empty,
                c if c.is_whitespace() || c == '|' || c == ',' => continue,
                other => {
                    return Err(BoardParseError::new(format!(
                        "Unexpected character '{}'",
                        other
                    )));
                }
            };
            if count == 9 {
                return Err(BoardParseError::new("More than 9 cells".to_string()));
            }
            squares[count] = square;
            count += 1;
        }

        if count != 9 {
            return Err(BoardParseError::new(format!(
                "Expected 9 cells, found {}",
                count
            )));
        }

        Ok(Self { squares })
    }
}

/// Error parsing a board from text.
#[derive(Debug, Clone, Display, Error)]
#[display("Board parse error: {} at {}:{}", message, file, line)]
pub struct BoardParseError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardParseError {
    /// Creates a new parse error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_separators() {
        let board: Board = "X|O|2\n3 X 5\n- - O".parse().unwrap();
        assert_eq!(board.get(Position::TopLeft), Square::Occupied(Player::X));
        assert_eq!(board.get(Position::TopCenter), Square::Occupied(Player::O));
        assert_eq!(board.get(Position::Center), Square::Occupied(Player::X));
        assert_eq!(board.get(Position::BottomRight), Square::Occupied(Player::O));
        assert_eq!(board.filled(), 4);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("XO".parse::<Board>().is_err());
        assert!("XOXOXOXOXO".parse::<Board>().is_err());
        assert!("XOXOXOXOZ".parse::<Board>().is_err());
    }

    #[test]
    fn test_next_player_follows_parity() {
        let mut board = Board::new();
        assert_eq!(board.next_player(), Player::X);
        board.set(Position::Center, Square::Occupied(Player::X));
        assert_eq!(board.next_player(), Player::O);
        board.set(Position::TopLeft, Square::Occupied(Player::O));
        assert_eq!(board.next_player(), Player::X);
    }

    #[test]
    fn test_first_empty_skips_occupied() {
        let board: Board = "XO-------".parse().unwrap();
        assert_eq!(board.first_empty(), Some(Position::TopRight));
        let full: Board = "XOXOXOOXO".parse().unwrap();
        assert_eq!(full.first_empty(), None);
    }

    #[test]
    fn test_compact_round_trips() {
        let board: Board = "X-O-X-O-X".parse().unwrap();
        assert_eq!(board.compact(), "X-O-X-O-X");
        assert_eq!(board.to_string(), "X-O-X-O-X");
    }
}
