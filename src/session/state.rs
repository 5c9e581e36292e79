//! Session state: the data the orchestrator owns and the UI renders.

use crate::games::tictactoe::{Board, Outcome, Player};
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark played by the human in AI mode. The human always moves first.
pub const HUMAN_MARK: Player = Player::X;

/// Mark played by the AI in AI mode.
pub const AI_MARK: Player = Player::O;

/// Commentary shown after a reset in AI mode.
pub const AI_RESET_MESSAGE: &str = "Resetting... Ready for another defeat?";

/// Commentary shown after a reset in local mode.
pub const PVP_RESET_MESSAGE: &str = "New round! Player X starts.";

/// Commentary shown when the process starts.
pub fn welcome_message(persona: &str) -> String {
    format!(
        "Welcome to the arena! I'm {}, let's see if you can keep up.",
        persona
    )
}

/// Who plays O.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Two humans share the keyboard.
    #[display("Local PvP")]
    #[value(name = "pvp")]
    LocalPvp,
    /// The human plays X against the model.
    #[default]
    #[display("vs AI Challenge")]
    #[value(name = "ai")]
    AiChallenge,
}

impl GameMode {
    /// The other mode.
    #[instrument]
    pub fn toggle(self) -> Self {
        match self {
            Self::LocalPvp => Self::AiChallenge,
            Self::AiChallenge => Self::LocalPvp,
        }
    }

    /// Commentary shown after a reset in this mode.
    pub fn reset_message(self) -> &'static str {
        match self {
            Self::LocalPvp => PVP_RESET_MESSAGE,
            Self::AiChallenge => AI_RESET_MESSAGE,
        }
    }
}

/// Win and draw counts for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize)]
pub struct Scoreboard {
    x_wins: u32,
    o_wins: u32,
    draws: u32,
}

impl Scoreboard {
    /// Counts a finished game. In-progress outcomes are ignored.
    #[instrument]
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Won {
                player: Player::X, ..
            } => self.x_wins += 1,
            Outcome::Won {
                player: Player::O, ..
            } => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => {}
        }
    }

    /// Total games counted.
    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Where the orchestrator's state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Phase {
    /// Waiting for human input.
    Idle,
    /// An AI move request is in flight; human input is refused.
    #[display("AI pending")]
    AiPending,
    /// The game is decided.
    Terminal,
}

/// Everything the session knows.
#[derive(Debug, Clone, Getters)]
pub struct SessionState {
    /// Current board.
    board: Board,
    /// Last evaluated outcome.
    outcome: Outcome,
    /// State machine position.
    phase: Phase,
    /// Latest commentary line.
    commentary: String,
    /// Scores across games.
    scoreboard: Scoreboard,
    /// Current mode.
    mode: GameMode,
    /// Bumped on every reset; replies from older generations are stale.
    generation: u64,
}

impl SessionState {
    /// Fresh session with an empty board and X to move.
    #[instrument]
    pub fn new(mode: GameMode, commentary: String) -> Self {
        Self {
            board: Board::new(),
            outcome: Outcome::InProgress,
            phase: Phase::Idle,
            commentary,
            scoreboard: Scoreboard::default(),
            mode,
            generation: 0,
        }
    }

    /// Player to move, derived from the number of marks on the board.
    pub fn next_player(&self) -> Player {
        self.board.next_player()
    }

    /// True while an AI move request is outstanding.
    pub fn is_ai_busy(&self) -> bool {
        self.phase == Phase::AiPending
    }

    /// True when the player to move is the AI.
    pub fn is_ai_turn(&self) -> bool {
        self.mode == GameMode::AiChallenge && self.next_player() == AI_MARK
    }

    pub(super) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(super) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    pub(super) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(super) fn set_commentary(&mut self, commentary: String) {
        self.commentary = commentary;
    }

    pub(super) fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    pub(super) fn scoreboard_mut(&mut self) -> &mut Scoreboard {
        &mut self.scoreboard
    }

    /// Clears the board for a new game and starts a new generation.
    pub(super) fn clear(&mut self) {
        self.board = Board::new();
        self.outcome = Outcome::InProgress;
        self.phase = Phase::Idle;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::LINES;

    #[test]
    fn test_scoreboard_counts_each_outcome() {
        let mut scores = Scoreboard::default();
        scores.record(&Outcome::Won {
            player: Player::X,
            line: LINES[0],
        });
        scores.record(&Outcome::Won {
            player: Player::O,
            line: LINES[6],
        });
        scores.record(&Outcome::Draw);
        scores.record(&Outcome::InProgress);
        assert_eq!(*scores.x_wins(), 1);
        assert_eq!(*scores.o_wins(), 1);
        assert_eq!(*scores.draws(), 1);
        assert_eq!(scores.games(), 3);
    }

    #[test]
    fn test_mode_toggle_and_messages() {
        assert_eq!(GameMode::default(), GameMode::AiChallenge);
        assert_eq!(GameMode::AiChallenge.toggle(), GameMode::LocalPvp);
        assert_eq!(GameMode::LocalPvp.reset_message(), PVP_RESET_MESSAGE);
        assert_eq!(GameMode::AiChallenge.reset_message(), AI_RESET_MESSAGE);
    }

    #[test]
    fn test_clear_bumps_generation() {
        let mut state = SessionState::new(GameMode::LocalPvp, "hi".to_string());
        state.clear();
        state.clear();
        assert_eq!(*state.generation(), 2);
        assert_eq!(*state.phase(), Phase::Idle);
    }
}
