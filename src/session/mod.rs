//! Game session: state, orchestration and async request plumbing.

mod command;
mod dispatcher;
mod orchestrator;
mod state;

pub use command::{ClickOutcome, Command, CommentaryTicket, IgnoreReason, MoveTicket, Reply};
pub use dispatcher::Dispatcher;
pub use orchestrator::Orchestrator;
pub use state::{
    AI_MARK, AI_RESET_MESSAGE, GameMode, HUMAN_MARK, PVP_RESET_MESSAGE, Phase, Scoreboard,
    SessionState, welcome_message,
};
