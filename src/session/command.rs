//! Requests the orchestrator hands out and the replies it accepts back.

use crate::games::tictactoe::{Board, Outcome, Player};
use crate::opponent::MoveSuggestion;
use derive_getters::Getters;
use derive_more::Display;

/// Everything needed to ask the service for a move.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveTicket {
    generation: u64,
    board: Board,
    ai: Player,
    opponent: Player,
}

impl MoveTicket {
    pub(super) fn new(generation: u64, board: Board, ai: Player, opponent: Player) -> Self {
        Self {
            generation,
            board,
            ai,
            opponent,
        }
    }
}

/// Everything needed to ask for a closing remark.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CommentaryTicket {
    generation: u64,
    board: Board,
    outcome: Outcome,
    last_player: Player,
}

impl CommentaryTicket {
    pub(super) fn new(
        generation: u64,
        board: Board,
        outcome: Outcome,
        last_player: Player,
    ) -> Self {
        Self {
            generation,
            board,
            outcome,
            last_player,
        }
    }
}

/// Async work requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the service for the AI's move.
    RequestMove(MoveTicket),
    /// Ask the service for a closing remark.
    RequestCommentary(CommentaryTicket),
}

/// Result of a [`Command`], tagged with the generation it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The AI's move.
    Move {
        /// Generation of the originating ticket.
        generation: u64,
        /// Chosen move, already validated or replaced by the fallback.
        suggestion: MoveSuggestion,
    },
    /// Closing remark.
    Commentary {
        /// Generation of the originating ticket.
        generation: u64,
        /// Remark text.
        remark: String,
    },
}

/// Why a click was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum IgnoreReason {
    /// Index outside 0-8.
    #[display("no such square")]
    OutOfBounds,
    /// The game is already decided.
    #[display("game is over")]
    GameOver,
    /// An AI move request is in flight.
    #[display("AI is thinking")]
    AiBusy,
    /// The square already holds a mark.
    #[display("square is taken")]
    Occupied,
    /// It is the AI's move.
    #[display("not your turn")]
    NotYourTurn,
}

/// What happened to a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The mark was placed; run these commands.
    Accepted(Vec<Command>),
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl ClickOutcome {
    /// Commands to run, empty when ignored.
    pub fn into_commands(self) -> Vec<Command> {
        match self {
            ClickOutcome::Accepted(commands) => commands,
            ClickOutcome::Ignored(_) => Vec::new(),
        }
    }
}
