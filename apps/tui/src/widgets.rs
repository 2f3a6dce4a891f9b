//! Reusable TUI widgets and layout helpers.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Bottom status bar.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {msg}")).style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White),
    )
}

/// Create a centered rectangle with percentage width and height.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
