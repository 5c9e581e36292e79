//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating a board according
//! to tic-tac-toe rules. Rules are separated from board storage so the
//! session layer can re-run them after every placed mark.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, Line, check_winner};

use super::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// No line is complete and at least one square is empty.
    InProgress,
    /// A player completed a line.
    Won {
        /// The winning player.
        player: Player,
        /// The completed line.
        line: Line,
    },
    /// Every square is filled and no line is complete.
    Draw,
}

impl Outcome {
    /// Returns true once the game is decided.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won { player, .. } => Some(*player),
            _ => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn line(&self) -> Option<Line> {
        match self {
            Outcome::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Won { player, line } => write!(f, "{} wins on {}", player, line),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Evaluates a board.
///
/// Total over every configuration of nine squares, reachable or not.
/// When several lines are complete the first one in [`LINES`] order wins.
#[instrument]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((player, line)) = check_winner(board) {
        return Outcome::Won { player, line };
    }

    if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
    }

    #[test]
    fn test_outcome_accessors() {
        let board: Board = "OOOXX-X--".parse().unwrap();
        let outcome = evaluate(&board);
        assert!(outcome.is_terminal());
        assert_eq!(outcome.winner(), Some(Player::O));
        assert_eq!(outcome.line().map(|l| l.indices()), Some([0, 1, 2]));

        assert!(!Outcome::InProgress.is_terminal());
        assert_eq!(Outcome::Draw.winner(), None);
        assert_eq!(Outcome::Draw.line(), None);
    }
}
