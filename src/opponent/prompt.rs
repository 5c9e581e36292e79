//! Prompt construction and reply parsing for the opponent.

use super::error::ServiceError;
use crate::games::tictactoe::{Board, Outcome, Player, Square};
use crate::llm_client::CompletionRequest;
use serde::Deserialize;
use tracing::{debug, instrument};

/// User message sent with every move request.
pub const MOVE_USER_MESSAGE: &str = "Analyze the board and make the best move.";

/// System instruction for closing remarks.
pub const COMMENTATOR_SYSTEM: &str = "You are a witty game commentator.";

/// Raw move reply as the model sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoveReply {
    /// Requested cell. Signed so out-of-range answers still parse and get rejected later.
    #[serde(rename = "move")]
    pub position: i64,
    /// Short remark about the move.
    pub commentary: String,
}

/// Board as nine `|`-separated tokens: the mark, or the cell index when empty.
pub fn board_tokens(board: &Board) -> String {
    board
        .squares()
        .iter()
        .enumerate()
        .map(|(idx, square)| match square {
            Square::Empty => idx.to_string(),
            Square::Occupied(player) => player.to_string(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Response schema for move requests.
pub fn move_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "move": {
                "type": "INTEGER",
                "description": "The index of the cell to play (0-8)."
            },
            "commentary": {
                "type": "STRING",
                "description": "A short, witty comment about the move."
            }
        },
        "required": ["move", "commentary"]
    })
}

/// Builds the move request for the AI playing `ai` against `opponent`.
#[instrument(skip(persona, board), fields(board = %board))]
pub fn move_request(
    persona: &str,
    board: &Board,
    ai: Player,
    opponent: Player,
) -> CompletionRequest {
    let system = format!(
        "You are a professional Tic Tac Toe AI named \"{persona}\".\n\
         Your goal is to win or at least draw.\n\
         You are also a bit of a cheeky commentator.\n\
         You must analyze the board state provided as a 0-indexed array \
         where numbers represent empty slots.\n\
         The current board state is: {board}\n\
         You are playing as: {ai}\n\
         Your opponent is: {opponent}\n\n\
         Provide your response in JSON format.\n\
         The \"move\" must be an integer (0-8) representing an empty slot.\n\
         The \"commentary\" should be a short, engaging sentence \
         about your move or the current game state.",
        board = board_tokens(board),
    );

    CompletionRequest::new(system, MOVE_USER_MESSAGE.to_string(), Some(move_schema()))
}

/// Builds the closing-remark request for a finished game.
#[instrument(skip(board), fields(board = %board))]
pub fn commentary_request(
    board: &Board,
    outcome: &Outcome,
    last_player: Player,
) -> CompletionRequest {
    let winner = match outcome.winner() {
        Some(player) => player.to_string(),
        None => "Draw".to_string(),
    };

    let user = format!(
        "The Tic Tac Toe game just ended.\n\
         Board state: {}\n\
         Winner: {}\n\
         Last player who moved: {}\n\
         Provide a final witty comment about the outcome. Keep it under 20 words.",
        board.compact(),
        winner,
        last_player
    );

    CompletionRequest::new(COMMENTATOR_SYSTEM.to_string(), user, None)
}

/// Parses a move reply, tolerating prose or code fences around the JSON object.
#[instrument(skip(text), fields(length = text.len()))]
pub fn parse_move_reply(text: &str) -> Result<MoveReply, ServiceError> {
    let json = extract_json_object(text)
        .ok_or_else(|| ServiceError::new(format!("No JSON object in reply: {}", text)))?;
    debug!(json, "Extracted JSON object");
    Ok(serde_json::from_str(json)?)
}

/// Returns the outermost `{...}` span of the text.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
