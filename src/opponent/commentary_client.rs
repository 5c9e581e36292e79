//! Closing remarks once a game is decided.

use super::error::ServiceError;
use super::prompt::commentary_request;
use super::service::CompletionService;
use crate::games::tictactoe::{Board, Outcome, Player};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Remark used whenever the service cannot supply one.
pub const FALLBACK_REMARK: &str = "Great game!";

/// Commentary client over any completion service.
pub struct CommentaryClient<S: ?Sized> {
    service: Arc<S>,
    timeout: Duration,
}

impl<S: CompletionService + ?Sized> CommentaryClient<S> {
    /// Creates a commentary client.
    pub fn new(service: Arc<S>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// A short remark on the finished game. Never fails.
    #[instrument(skip(self, board), fields(board = %board, outcome = %outcome))]
    pub async fn closing_remark(
        &self,
        board: &Board,
        outcome: &Outcome,
        last_player: Player,
    ) -> String {
        match self.request_remark(board, outcome, last_player).await {
            Ok(remark) => remark,
            Err(e) => {
                warn!(error = %e, "Closing commentary failed, using fallback");
                FALLBACK_REMARK.to_string()
            }
        }
    }

    #[instrument(skip(self, board, outcome))]
    async fn request_remark(
        &self,
        board: &Board,
        outcome: &Outcome,
        last_player: Player,
    ) -> Result<String, ServiceError> {
        let request = commentary_request(board, outcome, last_player);
        debug!(service = self.service.name(), "Sending commentary request");

        let text = tokio::time::timeout(self.timeout, self.service.complete(&request))
            .await??;
        let remark = text.trim();
        if remark.is_empty() {
            return Err(ServiceError::new("Empty remark"));
        }

        Ok(remark.to_string())
    }
}
