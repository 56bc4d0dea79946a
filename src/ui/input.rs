use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::state::{AppState, MAX_INPUT_LINES};
use crate::theme::ThemeColors;

/// Render the input box. It grows with the number of lines up to
/// `MAX_INPUT_LINES`, then scrolls to keep the cursor line visible.
pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let border = if state.controls.send { theme.text_dim } else { theme.text_muted };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if state.input.is_empty() {
        let placeholder = if state.controls.send {
            " type a message... (Shift+Enter for newline)"
        } else {
            " waiting for reply..."
        };
        let display_text = Line::from(Span::styled(
            placeholder,
            Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC),
        ));
        f.render_widget(Paragraph::new(display_text).block(block), area);
        return;
    }

    let (cursor_line, cursor_col) = cursor_line_col(&state.input, state.cursor_pos);
    let first_visible = (cursor_line + 1).saturating_sub(MAX_INPUT_LINES);
    let inner_width = area.width.saturating_sub(3).max(1) as usize; // 2 borders + 1 space prefix

    let mut display: Vec<Line> = Vec::new();
    for (i, text_line) in state.input.split('\n').enumerate().skip(first_visible).take(MAX_INPUT_LINES) {
        let chars: Vec<char> = text_line.chars().collect();

        if i != cursor_line {
            let visible: String = chars.iter().take(inner_width).collect();
            display.push(Line::from(vec![
                Span::raw(" "),
                Span::styled(visible, Style::default().fg(theme.text)),
            ]));
            continue;
        }

        // Horizontal scroll: keep cursor visible within inner_width
        let scroll_offset = if cursor_col < inner_width {
            0
        } else {
            cursor_col - inner_width + 1
        };
        let visible_end = (scroll_offset + inner_width).min(chars.len());
        let visible: Vec<char> = chars[scroll_offset.min(visible_end)..visible_end].to_vec();

        let cursor_in_view = cursor_col - scroll_offset;
        let before: String = visible.iter().take(cursor_in_view).collect();
        let cursor_char = visible.get(cursor_in_view).copied().unwrap_or(' ');
        let after: String = visible.iter().skip(cursor_in_view + 1).collect();

        let left_indicator = if scroll_offset > 0 { "…" } else { " " };

        display.push(Line::from(vec![
            Span::styled(left_indicator, Style::default().fg(theme.text_dim)),
            Span::styled(before, Style::default().fg(theme.text)),
            Span::styled(
                cursor_char.to_string(),
                Style::default().fg(theme.surface).bg(theme.text),
            ),
            Span::styled(after, Style::default().fg(theme.text)),
        ]));
    }

    f.render_widget(Paragraph::new(display).block(block), area);
}

/// Line index and column (both in chars) of a char cursor position.
fn cursor_line_col(input: &str, cursor: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for c in input.chars().take(cursor) {
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}
