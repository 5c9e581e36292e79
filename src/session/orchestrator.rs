//! The game orchestrator: turn order, AI sequencing and scoring.
//!
//! The orchestrator is synchronous. Transitions that need the network
//! return [`Command`]s; the caller runs them and feeds the [`Reply`]s
//! back in. Every command carries the generation it was issued in, and
//! replies from an older generation are dropped, which stands in for
//! cancelling requests on reset.

use super::command::{ClickOutcome, Command, CommentaryTicket, IgnoreReason, MoveTicket, Reply};
use super::state::{AI_MARK, GameMode, HUMAN_MARK, Phase, SessionState, welcome_message};
use crate::games::tictactoe::{Outcome, Position, Square, evaluate};
use crate::opponent::MoveSuggestion;
use tracing::{debug, info, instrument, warn};

/// Owns the session state and funnels every mutation through named transitions.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    state: SessionState,
}

impl Orchestrator {
    /// New session in `mode`, greeting from `persona`.
    #[instrument]
    pub fn new(mode: GameMode, persona: &str) -> Self {
        info!("Creating orchestrator");
        Self {
            state: SessionState::new(mode, welcome_message(persona)),
        }
    }

    /// Read-only view of the session.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Human input on square `index`.
    ///
    /// Ignored when the index is off the board, the game is over, the AI
    /// is thinking, the square is taken, or it is the AI's move.
    #[instrument(skip(self), fields(phase = %self.state.phase()))]
    pub fn click(&mut self, index: usize) -> ClickOutcome {
        let Some(pos) = Position::from_index(index) else {
            return self.ignore(IgnoreReason::OutOfBounds);
        };

        if self.state.outcome().is_terminal() {
            return self.ignore(IgnoreReason::GameOver);
        }
        if self.state.is_ai_busy() {
            return self.ignore(IgnoreReason::AiBusy);
        }
        if !self.state.board().is_empty(pos) {
            return self.ignore(IgnoreReason::Occupied);
        }
        if self.state.is_ai_turn() {
            return self.ignore(IgnoreReason::NotYourTurn);
        }

        ClickOutcome::Accepted(self.place(pos))
    }

    /// Starts the AI's turn if it is due and not already started.
    ///
    /// Fires only from `Idle` in AI mode with the game undecided and the
    /// AI to move. Firing moves to `AiPending`, so calling this again in
    /// the same turn returns `None`.
    #[instrument(skip(self), fields(phase = %self.state.phase()))]
    pub fn maybe_trigger_ai(&mut self) -> Option<MoveTicket> {
        if *self.state.phase() != Phase::Idle
            || self.state.outcome().is_terminal()
            || !self.state.is_ai_turn()
        {
            return None;
        }

        self.state.set_phase(Phase::AiPending);
        let ticket = MoveTicket::new(
            *self.state.generation(),
            self.state.board().clone(),
            AI_MARK,
            HUMAN_MARK,
        );
        info!(generation = ticket.generation(), "AI turn started");
        Some(ticket)
    }

    /// Applies the AI's move from generation `generation`.
    ///
    /// Stale or unexpected replies are dropped. The move goes through the
    /// same placement path as a click; if the square is not playable the
    /// lowest empty square is used instead.
    #[instrument(skip(self, suggestion), fields(position = suggestion.position.to_index()))]
    pub fn resolve_move(&mut self, generation: u64, suggestion: MoveSuggestion) -> Vec<Command> {
        if generation != *self.state.generation() {
            debug!(current = self.state.generation(), "Dropping stale AI move");
            return Vec::new();
        }
        if *self.state.phase() != Phase::AiPending {
            warn!(phase = %self.state.phase(), "AI move arrived outside of AI turn");
            return Vec::new();
        }

        self.state.set_phase(Phase::Idle);
        self.state.set_commentary(suggestion.commentary);

        let pos = if self.state.board().is_empty(suggestion.position) {
            suggestion.position
        } else if let Some(pos) = self.state.board().first_empty() {
            warn!(fallback = pos.to_index(), "AI picked an occupied square");
            pos
        } else {
            warn!("AI move on a full board");
            return Vec::new();
        };

        self.place(pos)
    }

    /// Applies a closing remark. Returns false if it was stale.
    #[instrument(skip(self, remark))]
    pub fn resolve_commentary(&mut self, generation: u64, remark: String) -> bool {
        if generation != *self.state.generation() {
            debug!(current = self.state.generation(), "Dropping stale commentary");
            return false;
        }

        self.state.set_commentary(remark);
        true
    }

    /// Routes a dispatcher reply to the matching transition.
    pub fn apply_reply(&mut self, reply: Reply) -> Vec<Command> {
        match reply {
            Reply::Move {
                generation,
                suggestion,
            } => self.resolve_move(generation, suggestion),
            Reply::Commentary { generation, remark } => {
                self.resolve_commentary(generation, remark);
                Vec::new()
            }
        }
    }

    /// Clears the board for a new game. Scores are kept.
    ///
    /// In-flight requests are not cancelled; their replies become stale.
    #[instrument(skip(self), fields(mode = %self.state.mode()))]
    pub fn reset(&mut self) {
        self.state.clear();
        let message = self.state.mode().reset_message();
        self.state.set_commentary(message.to_string());
        info!(generation = self.state.generation(), "Game reset");
    }

    /// Switches mode. Always resets the board.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: GameMode) {
        self.state.set_mode(mode);
        self.reset();
    }

    /// Places the next player's mark at `pos` and runs the follow-up logic.
    fn place(&mut self, pos: Position) -> Vec<Command> {
        let player = self.state.next_player();
        self.state.board_mut().set(pos, Square::Occupied(player));

        let outcome = evaluate(self.state.board());
        info!(player = %player, position = pos.to_index(), outcome = %outcome, "Mark placed");

        if outcome.is_terminal() {
            self.finish(outcome);
            let ticket = CommentaryTicket::new(
                *self.state.generation(),
                self.state.board().clone(),
                outcome,
                player,
            );
            return vec![Command::RequestCommentary(ticket)];
        }

        self.maybe_trigger_ai()
            .map(Command::RequestMove)
            .into_iter()
            .collect()
    }

    fn finish(&mut self, outcome: Outcome) {
        self.state.set_outcome(outcome);
        self.state.scoreboard_mut().record(&outcome);
        self.state.set_phase(Phase::Terminal);
    }

    fn ignore(&self, reason: IgnoreReason) -> ClickOutcome {
        debug!(%reason, "Click ignored");
        ClickOutcome::Ignored(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Player;

    fn pvp() -> Orchestrator {
        Orchestrator::new(GameMode::LocalPvp, "Prime")
    }

    #[test]
    fn test_pvp_alternates_marks() {
        let mut orch = pvp();
        assert_eq!(orch.click(0), ClickOutcome::Accepted(Vec::new()));
        assert_eq!(orch.click(4), ClickOutcome::Accepted(Vec::new()));
        let board = orch.state().board();
        assert_eq!(board.get(Position::TopLeft), Square::Occupied(Player::X));
        assert_eq!(board.get(Position::Center), Square::Occupied(Player::O));
        assert_eq!(orch.state().next_player(), Player::X);
    }

    #[test]
    fn test_out_of_bounds_click_ignored() {
        let mut orch = pvp();
        let outcome = orch.click(9);
        assert_eq!(outcome, ClickOutcome::Ignored(IgnoreReason::OutOfBounds));
        assert_eq!(orch.state().board().filled(), 0);
    }

    #[test]
    fn test_welcome_message_uses_persona() {
        let orch = pvp();
        assert!(orch.state().commentary().contains("I'm Prime"));
    }

    #[test]
    fn test_resolve_move_outside_ai_turn_is_dropped() {
        let mut orch = Orchestrator::new(GameMode::AiChallenge, "Prime");
        let suggestion = MoveSuggestion::new(Position::Center, "hi".to_string());
        assert!(orch.resolve_move(0, suggestion).is_empty());
        assert_eq!(orch.state().board().filled(), 0);
    }
}
