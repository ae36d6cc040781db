use crate::game::{Cell, Coordinate, Participant, Side};
use crate::session::{GameMode, SessionView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, view: &SessionView, message: &Option<String>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(15),  // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn side_color(side: Side) -> Color {
    match side {
        Side::A => Color::Blue,
        Side::B => Color::Red,
    }
}

fn render_header(frame: &mut Frame, view: &SessionView, area: ratatui::layout::Rect) {
    let mode = match view.mode {
        GameMode::VsComputer(difficulty) => format!("vs Computer ({difficulty})"),
        GameMode::VsHuman => "vs Human".to_string(),
    };
    let color = view.side_to_move().map_or(Color::White, side_color);

    let header = Paragraph::new(format!("{}  |  {}", view.status(), mode))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &SessionView, area: ratatui::layout::Rect) {
    let cols = view.cols();
    let winning = view.winning_line().unwrap_or_default();
    // The cursor only matters while a human is choosing a column.
    let selected = match view.side_to_move() {
        Some(side) if !view.is_finished() && view.participant(side) != Some(Participant::Computer) => {
            Some((side, view.cursor(side)))
        }
        _ => None,
    };

    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..cols {
        match selected {
            Some((side, cursor)) if cursor == col => col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(side_color(side))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            _ => col_line.push(Span::raw(format!(" {} ", col + 1))),
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    let border = "═".repeat(cols * 3 + 1);
    lines.push(Line::from(format!("  ╔{border}╗")));

    for row in 0..view.rows() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..cols {
            let won = winning.contains(&Coordinate::new(row, col));
            let (symbol, color) = match view.cell(row, col).unwrap_or_default() {
                Cell::Empty => (" . ", Color::DarkGray),
                Cell::PlayerA => (" ● ", if won { Color::Green } else { side_color(Side::A) }),
                Cell::PlayerB => (" ● ", if won { Color::Green } else { side_color(Side::B) }),
            };
            row_spans.push(Span::styled(symbol, Style::default().fg(color)));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{border}╝")));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: ratatui::layout::Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let line = Line::from("←/→ Home/End: Move  |  Enter or 1-9: Drop  |  R: Restart  |  Q: Quit");

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
