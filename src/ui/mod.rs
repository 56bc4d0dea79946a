pub mod chat;
pub mod files;
pub mod input;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::state::AppState;

/// Render the full UI layout.
pub fn render(f: &mut Frame, state: &AppState) {
    let theme = state.theme.colors();
    let size = f.area();

    // Paint the theme surface so light mode works on dark terminals too
    f.render_widget(
        Block::default().style(Style::default().bg(theme.surface).fg(theme.text)),
        size,
    );

    // Layout: chat fills space, input grows with its content, status bar is 1 row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                                  // chat (+ files)
            Constraint::Length(state.input_lines() as u16 + 2), // input
            Constraint::Length(1),                               // status bar
        ])
        .split(size);

    if state.file_cards.is_empty() {
        chat::render(f, chunks[0], state, theme);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[0]);
        chat::render(f, body[0], state, theme);
        files::render(f, body[1], state, theme);
    }

    input::render(f, chunks[1], state, theme);
    status_bar::render(f, chunks[2], state, theme);
}
