//! The AI opponent: move selection and commentary from an external model.
//!
//! Both clients treat the service as unreliable and always resolve to a
//! usable value, so callers never handle an error from them.

mod commentary_client;
mod error;
mod move_client;
mod prompt;
mod service;

pub use commentary_client::{CommentaryClient, FALLBACK_REMARK};
pub use error::ServiceError;
pub use move_client::{FALLBACK_MOVE_COMMENTARY, MoveClient, MoveSuggestion};
pub use prompt::{MoveReply, board_tokens, commentary_request, move_request, parse_move_reply};
pub use service::{CompletionService, OfflineService};
