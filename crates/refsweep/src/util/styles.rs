//! Colours for the console summary table

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};

/// Table title and border
pub const BORDER_COLOR: Color = Color::Cyan;

/// Header row
pub const HEADER_COLOR: Color = Color::Yellow;

/// Target parameter column
pub const VALUE_COLOR: Color = Color::Green;

/// Context column
pub const CONTEXT_COLOR: Color = Color::DarkGray;

/// A bordered block titled in bold
pub fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

/// Bold header style
pub fn header_style() -> Style {
    Style::default()
        .fg(HEADER_COLOR)
        .add_modifier(Modifier::BOLD)
}
