use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::state::{AppState, MessageRole};
use crate::theme::ThemeColors;

/// Typing placeholder frames: three dots lighting up in turn.
const DOT_FRAMES: &[[bool; 3]] = &[
    [true, false, false],
    [true, true, false],
    [true, true, true],
    [false, true, true],
    [false, false, true],
    [false, false, false],
];

/// Render the chat zone.
pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let block = Block::default().borders(Borders::NONE);

    let mut lines: Vec<Line> = Vec::new();

    // Welcome message if no messages
    if state.log.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  chatbox", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
            Span::styled(" terminal", Style::default().fg(theme.text_muted)),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  /files <path> then /upload to ask about a file, /help for more",
            Style::default().fg(theme.text_dim),
        )));
    }

    for msg in state.log.entries() {
        lines.push(Line::from("")); // spacing

        let (label, label_color) = match msg.role {
            MessageRole::You => ("  you", theme.text_muted),
            MessageRole::Bot => ("  bot", theme.primary),
        };
        let mut header = vec![
            Span::styled(label, Style::default().fg(label_color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", msg.timestamp), Style::default().fg(theme.text_dim)),
        ];

        match msg.text() {
            None => {
                header.push(Span::raw(" "));
                header.extend(typing_dots(state.spinner_tick, theme));
                lines.push(Line::from(header));
            }
            Some(text) => {
                lines.push(Line::from(header));
                let color = text_color(text, theme);
                for content_line in text.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", content_line),
                        Style::default().fg(color),
                    )));
                }
            }
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });

    // Rows counted the way the widget wraps them
    let total_lines = paragraph.line_count(area.width);
    let paragraph = paragraph.scroll((scroll_rows(total_lines, area.height, state), 0));

    f.render_widget(paragraph, area);

    // Newer messages below the view
    if !state.log.auto_scroll && state.log.scroll_offset > 0 {
        let indicator = Span::styled(" [more] ", Style::default().fg(Color::Black).bg(theme.warning));
        let indicator_area = Rect {
            x: area.x + area.width.saturating_sub(9),
            y: area.y + area.height.saturating_sub(1),
            width: 8.min(area.width),
            height: 1,
        };
        f.render_widget(Paragraph::new(Line::from(indicator)), indicator_area);
    }
}

/// Top row to show: the bottom when auto-scrolling, else `scroll_offset`
/// rows above it.
fn scroll_rows(total_lines: usize, visible_height: u16, state: &AppState) -> u16 {
    let max_scroll = total_lines.saturating_sub(visible_height as usize);
    let scroll = if state.log.auto_scroll {
        max_scroll
    } else {
        max_scroll.saturating_sub(state.log.scroll_offset)
    };
    u16::try_from(scroll).unwrap_or(u16::MAX)
}

fn text_color(text: &str, theme: &ThemeColors) -> Color {
    if text.starts_with('❌') {
        theme.error
    } else if text.starts_with('⚠') || text.starts_with('⏳') {
        theme.warning
    } else {
        theme.text
    }
}

fn typing_dots(tick: usize, theme: &ThemeColors) -> Vec<Span<'static>> {
    let frame = DOT_FRAMES[tick % DOT_FRAMES.len()];
    frame
        .iter()
        .map(|&lit| {
            let color = if lit { theme.primary } else { theme.text_dim };
            Span::styled("● ", Style::default().fg(color))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::test_state;
    use crate::theme::builtin;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = state.theme.colors().clone();
        terminal
            .draw(|f| render(f, f.area(), state, &theme))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_newest_message_tail_visible_when_narrow() {
        let mut state = test_state();
        for i in 0..5 {
            state.add_bot_message(format!("filler {i}"));
        }
        state.add_bot_message("aaaaaa bbbbbb cccccc dddddd eeeeee ffffff gggggg ZZZEND");

        let screen = screen_text(&state, 12, 8);
        assert!(screen.contains("ZZZEND"), "screen was {screen:?}");
        assert!(screen.contains("gggggg"));
    }

    #[test]
    fn test_scrolled_up_hides_tail() {
        let mut state = test_state();
        for i in 0..20 {
            state.add_bot_message(format!("line {i}"));
        }
        state.add_bot_message("LASTONE");
        state.log.auto_scroll = false;
        state.log.scroll_offset = 10;

        let screen = screen_text(&state, 20, 6);
        assert!(!screen.contains("LASTONE"));
    }

    #[test]
    fn test_scroll_rows_clamps_huge_logs() {
        let mut state = test_state();
        assert_eq!(scroll_rows(10, 20, &state), 0);
        assert_eq!(scroll_rows(30, 20, &state), 10);
        assert_eq!(scroll_rows(200_000, 20, &state), u16::MAX);

        state.log.auto_scroll = false;
        state.log.scroll_offset = 5;
        assert_eq!(scroll_rows(30, 20, &state), 5);
    }

    #[test]
    fn test_typing_dots_has_three() {
        let theme = builtin::dark();
        for tick in 0..DOT_FRAMES.len() {
            assert_eq!(typing_dots(tick, &theme).len(), 3);
        }
    }

    #[test]
    fn test_error_text_color() {
        let theme = builtin::dark();
        assert_eq!(text_color("❌ Upload failed: x", &theme), theme.error);
        assert_eq!(text_color("hello", &theme), theme.text);
    }
}
