//! Tic-tac-toe arena library.
//!
//! A human plays X against an LLM opponent (or another human) in the
//! terminal. The opponent's moves and commentary come from a hosted
//! model; when the model is slow, wrong or unreachable the game falls
//! back to deterministic answers and keeps going.
//!
//! # Architecture
//!
//! - **Games**: board model and the pure win/draw evaluator
//! - **Opponent**: move and commentary clients over a completion service
//! - **Session**: the orchestrator state machine and async dispatcher
//! - **TUI**: ratatui front end
//!
//! # Example
//!
//! ```
//! use tictactoe_arena::{Board, Outcome, evaluate};
//!
//! let board: Board = "XXXOO----".parse().unwrap();
//! match evaluate(&board) {
//!     Outcome::Won { player, line } => {
//!         assert_eq!(player.to_string(), "X");
//!         assert_eq!(line.indices(), [0, 1, 2]);
//!     }
//!     other => panic!("unexpected {other}"),
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod games;
pub mod llm_client;
mod opponent;
mod session;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{ArenaConfig, ConfigError};

// Crate-level exports - LLM client
pub use llm_client::{CompletionRequest, LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Opponent
pub use opponent::{
    CommentaryClient, CompletionService, FALLBACK_MOVE_COMMENTARY, FALLBACK_REMARK, MoveClient,
    MoveReply, MoveSuggestion, OfflineService, ServiceError, board_tokens, commentary_request,
    move_request, parse_move_reply,
};

// Crate-level exports - Session
pub use session::{
    AI_MARK, AI_RESET_MESSAGE, ClickOutcome, Command, CommentaryTicket, Dispatcher, GameMode,
    HUMAN_MARK, IgnoreReason, MoveTicket, Orchestrator, PVP_RESET_MESSAGE, Phase, Reply,
    Scoreboard, SessionState, welcome_message,
};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, BoardParseError, LINES, Line, Outcome, Player, Position, Square, check_winner,
    evaluate, is_full,
};
