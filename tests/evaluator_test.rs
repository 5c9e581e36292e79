//! Tests for the win/draw evaluator.

use tictactoe_arena::{Board, LINES, Outcome, Player, Position, Square, evaluate};

/// Decodes a base-3 number into a board: 0 empty, 1 X, 2 O.
fn board_from_code(mut code: u32) -> Board {
    let mut squares = [Square::Empty; 9];
    for square in squares.iter_mut() {
        *square = match code % 3 {
            0 => Square::Empty,
            1 => Square::Occupied(Player::X),
            _ => Square::Occupied(Player::O),
        };
        code /= 3;
    }
    Board::from_squares(squares)
}

/// Independent reference: every complete line, in priority order.
fn complete_lines(board: &Board) -> Vec<(Player, [usize; 3])> {
    LINES
        .iter()
        .filter_map(|line| {
            let [a, b, c] = line.indices();
            match (board.square(a), board.square(b), board.square(c)) {
                (Some(Square::Occupied(p)), Some(Square::Occupied(q)), Some(Square::Occupied(r)))
                    if p == q && q == r =>
                {
                    Some((p, line.indices()))
                }
                _ => None,
            }
        })
        .collect()
}

#[test]
fn test_x_wins_top_row() {
    let board: Board = "XXXOO____".parse().unwrap();
    match evaluate(&board) {
        Outcome::Won { player, line } => {
            assert_eq!(player, Player::X);
            assert_eq!(line.indices(), [0, 1, 2]);
        }
        other => panic!("Expected a win, got {:?}", other),
    }
}

#[test]
fn test_full_board_without_line_is_draw() {
    let board: Board = "XOXOXOOXO".parse().unwrap();
    assert_eq!(evaluate(&board), Outcome::Draw);
}

#[test]
fn test_row_beats_diagonal_when_both_complete() {
    // Row 0 and diagonal 0-4-8 are both X.
    let board: Board = "XXXOXO-OX".parse().unwrap();
    let outcome = evaluate(&board);
    assert_eq!(outcome.winner(), Some(Player::X));
    assert_eq!(outcome.line().map(|l| l.indices()), Some([0, 1, 2]));
}

#[test]
fn test_column_beats_diagonal() {
    // Column 0 and diagonal 0-4-8 are both X.
    let board: Board = "X-OXXOX-X".parse().unwrap();
    let outcome = evaluate(&board);
    assert_eq!(outcome.winner(), Some(Player::X));
    assert_eq!(outcome.line().map(|l| l.indices()), Some([0, 3, 6]));
}

#[test]
fn test_unreachable_boards_are_handled() {
    // Both players have a line; rows come first so X wins.
    let board: Board = "XXXOOO---".parse().unwrap();
    assert_eq!(evaluate(&board).winner(), Some(Player::X));

    // All O, nothing X.
    let board: Board = "OOOOOOOOO".parse().unwrap();
    let line = evaluate(&board).line();
    assert_eq!(line.map(|l| l.indices()), Some([0, 1, 2]));
}

#[test]
fn test_every_configuration_matches_reference() {
    for code in 0..3u32.pow(9) {
        let board = board_from_code(code);
        let outcome = evaluate(&board);
        let lines = complete_lines(&board);

        match lines.first() {
            Some((player, indices)) => {
                assert_eq!(outcome.winner(), Some(*player), "board {}", board);
                let indices = Some(*indices);
                assert_eq!(outcome.line().map(|l| l.indices()), indices, "board {}", board);
            }
            None if board.filled() == 9 => assert_eq!(outcome, Outcome::Draw, "board {}", board),
            None => assert_eq!(outcome, Outcome::InProgress, "board {}", board),
        }

        // Pure: same answer twice.
        assert_eq!(evaluate(&board), outcome);
    }
}

#[test]
fn test_one_empty_square_without_line_in_progress() {
    for code in 0..3u32.pow(9) {
        let board = board_from_code(code);
        if board.filled() == 8 && complete_lines(&board).is_empty() {
            assert_eq!(evaluate(&board), Outcome::InProgress, "board {}", board);
        }
    }
}

#[test]
fn test_winning_line_contains_its_positions() {
    let board: Board = "--X-X-X--".parse().unwrap();
    let line = evaluate(&board).line().expect("anti-diagonal win");
    assert_eq!(
        line.positions(),
        [Position::TopRight, Position::Center, Position::BottomLeft]
    );
}
