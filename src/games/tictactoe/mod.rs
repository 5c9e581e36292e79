mod position;
mod rules;
mod types;

pub use position::Position;
pub use rules::{LINES, Line, Outcome, check_winner, evaluate, is_full};
pub use types::{Board, BoardParseError, Player, Square};
