//! Stateless UI rendering for the arena.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::App;
use crate::games::tictactoe::{Board, Player, Position, Square};
use crate::session::SessionState;

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(13),   // Body
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new(app.persona().to_uppercase())
        .style(bold(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Tic-Tac-Toe Arena"));
    frame.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
        ])
        .split(chunks[1]);

    draw_scoreboard(frame, body[0], app.session());
    draw_board(frame, body[1], app.session(), app.cursor());
    draw_commentary(frame, body[2], app);

    let status = Paragraph::new(app.status_line())
        .style(bold(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("1-9 / arrows+Enter: move | R: Restart | M: Switch mode | Q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);
}

fn draw_scoreboard(frame: &mut Frame, area: Rect, session: &SessionState) {
    let scores = session.scoreboard();
    let lines = vec![
        score_line("Player X", *scores.x_wins(), Color::Blue),
        score_line("Player O", *scores.o_wins(), Color::Magenta),
        score_line("Draws", *scores.draws(), Color::Gray),
        Line::from(""),
        Line::from(vec![
            Span::raw("Mode: "),
            Span::styled(session.mode().to_string(), bold(Color::Cyan)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Scoreboard"));
    frame.render_widget(paragraph, area);
}

fn score_line(label: &str, value: u32, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<10}", label)),
        Span::styled(value.to_string(), bold(color)),
    ])
}

fn draw_commentary(frame: &mut Frame, area: Rect, app: &App) {
    let text = format!("\"{}\"\n\n  - {}", app.session().commentary(), app.persona());
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let paragraph = Paragraph::new(text)
        .style(italic.fg(Color::White))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("AI Logs"));
    frame.render_widget(paragraph, area);
}

fn draw_board(frame: &mut Frame, area: Rect, session: &SessionState, cursor: Position) {
    let block = Block::default().borders(Borders::ALL).title("Board");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let board_area = center_rect(inner, 23, 11);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    let winning = session.outcome().line();
    let locked = session.outcome().is_terminal() || session.is_ai_busy();

    for (row, area) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Length(1),
                Constraint::Length(7),
            ])
            .split(area);

        for (col, cell_area) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
            if let Some(pos) = Position::from_index(row * 3 + col) {
                let highlight = winning.is_some_and(|line| line.contains(pos));
                let cursor_here = pos == cursor && !locked;
                draw_cell(
                    frame,
                    cell_area,
                    session.board(),
                    pos,
                    highlight,
                    cursor_here,
                );
            }
        }
        draw_separator_vertical(frame, cols[1]);
        draw_separator_vertical(frame, cols[3]);
    }

    draw_separator(frame, rows[1]);
    draw_separator(frame, rows[3]);
}

fn draw_cell(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    pos: Position,
    highlight: bool,
    cursor: bool,
) {
    let (symbol, base_style) = match board.get(pos) {
        Square::Empty => (
            (pos.to_index() + 1).to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Square::Occupied(Player::X) => ("X".to_string(), bold(Color::Blue)),
        Square::Occupied(Player::O) => ("O".to_string(), bold(Color::Magenta)),
    };

    let style = if highlight {
        base_style.bg(Color::Yellow).fg(Color::Black)
    } else if cursor {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    // Middle line of the three-line cell.
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {} ", symbol), style)),
    ];
    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"), Line::from("│"), Line::from("│")])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
