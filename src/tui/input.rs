//! Keyboard mapping for the game screen.

use crate::games::tictactoe::Position;
use crossterm::event::KeyCode;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the game.
    Quit,
    /// Start a new game.
    Reset,
    /// Switch between AI and local play (resets the board).
    ToggleMode,
    /// Play the square with this index.
    Select(usize),
    /// Play the square under the cursor.
    SelectCursor,
    /// Move the cursor.
    Cursor(KeyCode),
}

/// Maps a key to an action. Digits 1-9 pick squares left-to-right, top-to-bottom.
pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('m') => Some(Action::ToggleMode),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|digit| Action::Select(digit as usize - 1)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::SelectCursor),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => Some(Action::Cursor(key)),
        _ => None,
    }
}

/// Moves cursor based on arrow keys. Stops at the board edge.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let index = cursor.to_index();
    let (row, col) = (index / 3, index % 3);

    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };

    Position::from_index(row * 3 + col).unwrap_or(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_within_board() {
        let center = Position::Center;
        assert_eq!(move_cursor(center, KeyCode::Up), Position::TopCenter);
        assert_eq!(move_cursor(center, KeyCode::Right), Position::MiddleRight);

        // Edges clamp.
        let corner = Position::TopLeft;
        assert_eq!(move_cursor(corner, KeyCode::Left), corner);
        assert_eq!(move_cursor(corner, KeyCode::Up), corner);
    }

    #[test]
    fn test_digit_keys_map_to_indices() {
        assert_eq!(action_for(KeyCode::Char('1')), Some(Action::Select(0)));
        assert_eq!(action_for(KeyCode::Char('9')), Some(Action::Select(8)));
        assert_eq!(action_for(KeyCode::Char('0')), None);
        assert_eq!(action_for(KeyCode::Esc), Some(Action::Quit));
    }
}
