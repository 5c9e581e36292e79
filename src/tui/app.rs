//! Application state for the terminal game.

use super::input::{Action, action_for, move_cursor};
use crate::games::tictactoe::{Outcome, Position};
use crate::session::{ClickOutcome, Dispatcher, IgnoreReason, Orchestrator, Reply, SessionState};
use crossterm::event::KeyCode;
use tracing::{debug, info, instrument};

/// Main application state.
pub struct App {
    orchestrator: Orchestrator,
    dispatcher: Dispatcher,
    persona: String,
    cursor: Position,
    last_ignored: Option<IgnoreReason>,
    should_quit: bool,
}

impl App {
    /// Creates a new application.
    pub fn new(
        orchestrator: Orchestrator,
        dispatcher: Dispatcher,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            dispatcher,
            persona: persona.into(),
            cursor: Position::Center,
            last_ignored: None,
            should_quit: false,
        }
    }

    /// Session state for rendering.
    pub fn session(&self) -> &SessionState {
        self.orchestrator.state()
    }

    /// Square under the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Name the AI goes by.
    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// True once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles a key press.
    #[instrument(skip(self))]
    pub fn handle_key(&mut self, key: KeyCode) {
        let Some(action) = action_for(key) else {
            return;
        };
        debug!(?action, "Key action");

        match action {
            Action::Quit => {
                info!("User quit");
                self.should_quit = true;
            }
            Action::Reset => {
                self.last_ignored = None;
                self.orchestrator.reset();
            }
            Action::ToggleMode => {
                self.last_ignored = None;
                let mode = self.orchestrator.state().mode().toggle();
                self.orchestrator.set_mode(mode);
            }
            Action::Select(index) => self.click(index),
            Action::SelectCursor => self.click(self.cursor.to_index()),
            Action::Cursor(key) => self.cursor = move_cursor(self.cursor, key),
        }
    }

    /// Feeds a dispatcher reply into the session.
    #[instrument(skip(self))]
    pub fn handle_reply(&mut self, reply: Reply) {
        let commands = self.orchestrator.apply_reply(reply);
        self.dispatcher.dispatch_all(commands);
    }

    /// One-line summary of whose move it is or how the game ended.
    pub fn status_line(&self) -> String {
        let session = self.session();
        let status = match session.outcome() {
            Outcome::Won { player, .. } => format!("Player {} Wins!", player),
            Outcome::Draw => "It's a Tie!".to_string(),
            Outcome::InProgress if session.is_ai_busy() => {
                format!("{} is thinking...", self.persona)
            }
            Outcome::InProgress => format!("Current Turn: {}", session.next_player()),
        };

        match self.last_ignored {
            Some(reason) => format!("{} ({})", status, reason),
            None => status,
        }
    }

    fn click(&mut self, index: usize) {
        match self.orchestrator.click(index) {
            ClickOutcome::Accepted(commands) => {
                self.last_ignored = None;
                if let Some(pos) = Position::from_index(index) {
                    self.cursor = pos;
                }
                self.dispatcher.dispatch_all(commands);
            }
            ClickOutcome::Ignored(reason) => self.last_ignored = Some(reason),
        }
    }
}
