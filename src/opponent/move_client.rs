//! Asks the external service for the AI's next move.

use super::error::ServiceError;
use super::prompt::{move_request, parse_move_reply};
use super::service::CompletionService;
use crate::games::tictactoe::{Board, Player, Position};
use derive_new::new;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Commentary used whenever the service cannot supply a move.
pub const FALLBACK_MOVE_COMMENTARY: &str =
    "I'm having a bit of a processing lag, but I'll still beat you!";

/// A chosen cell plus the AI's remark about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct MoveSuggestion {
    /// Cell to play.
    pub position: Position,
    /// Short remark about the move.
    pub commentary: String,
}

impl MoveSuggestion {
    /// The deterministic fallback: lowest empty cell and the lag excuse.
    ///
    /// Callers never ask for a move on a full board; if they do, the
    /// top-left corner is returned and the orchestrator will reject it.
    pub fn fallback(board: &Board) -> Self {
        Self {
            position: board.first_empty().unwrap_or(Position::TopLeft),
            commentary: FALLBACK_MOVE_COMMENTARY.to_string(),
        }
    }
}

/// Move client over any completion service.
#[derive(Debug)]
pub struct MoveClient<S: ?Sized> {
    service: Arc<S>,
    persona: String,
    timeout: Duration,
}

impl<S: CompletionService + ?Sized> MoveClient<S> {
    /// Creates a move client.
    #[instrument(skip(service, persona), fields(service = service.name()))]
    pub fn new(service: Arc<S>, persona: impl Into<String>, timeout: Duration) -> Self {
        Self {
            service,
            persona: persona.into(),
            timeout,
        }
    }

    /// Picks a move for `ai`. Never fails: any service problem yields
    /// [`MoveSuggestion::fallback`].
    #[instrument(skip(self, board), fields(board = %board, ai = %ai))]
    pub async fn choose_move(&self, board: &Board, ai: Player, opponent: Player) -> MoveSuggestion {
        match self.request_move(board, ai, opponent).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                warn!(error = %e, "AI move request failed, using fallback move");
                MoveSuggestion::fallback(board)
            }
        }
    }

    /// Requests a move and validates it against the board.
    ///
    /// The reply is untrusted: an index outside 0-8 or pointing at an
    /// occupied cell is an error, same as a failed request.
    #[instrument(skip(self, board), fields(board = %board, ai = %ai))]
    pub async fn request_move(
        &self,
        board: &Board,
        ai: Player,
        opponent: Player,
    ) -> Result<MoveSuggestion, ServiceError> {
        let request = move_request(&self.persona, board, ai, opponent);

        debug!(service = self.service.name(), "Sending move request");
        let text = tokio::time::timeout(self.timeout, self.service.complete(&request))
            .await??;
        let reply = parse_move_reply(&text)?;

        let position = usize::try_from(reply.position)
            .ok()
            .and_then(Position::from_index)
            .ok_or_else(|| {
                ServiceError::new(format!("Move {} is off the board", reply.position))
            })?;

        if !board.is_empty(position) {
            return Err(ServiceError::new(format!(
                "Move {} targets an occupied cell",
                reply.position
            )));
        }

        info!(position = position.to_index(), "AI chose move");
        Ok(MoveSuggestion::new(position, reply.commentary))
    }
}
