use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::state::AppState;
use crate::theme::ThemeColors;

/// Columns kept of the context file name.
const SOURCE_NAME_WIDTH: usize = 24;

/// Render the status bar (bottom row).
pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let (dot, dot_color) = if state.sending || state.uploading {
        ("◌", theme.warning)
    } else {
        ("●", theme.accent)
    };

    let activity = if state.sending {
        "sending"
    } else if state.uploading {
        "uploading"
    } else {
        "idle"
    };

    let context_info = if state.context.is_attachable() {
        format!(
            " │ ctx: {} ({} chars)",
            fit_width(&state.context.source_name, SOURCE_NAME_WIDTH),
            state.context.text.chars().count()
        )
    } else {
        String::new()
    };

    let selected_info = if state.selected_files.is_empty() {
        String::new()
    } else {
        format!(" │ {} selected", state.selected_files.len())
    };

    let mut spans = vec![
        Span::styled(" ", Style::default().fg(theme.text_dim)),
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::styled(format!(" {} ", activity), Style::default().fg(theme.text_muted)),
        Span::styled("│ ", Style::default().fg(theme.text_dim)),
        Span::styled(state.server_url.as_str(), Style::default().fg(theme.primary)),
        Span::styled(" │ ", Style::default().fg(theme.text_dim)),
    ];
    spans.extend(control_spans(state, theme));
    spans.extend([
        Span::styled(" │ ", Style::default().fg(theme.text_dim)),
        Span::styled(state.theme.label(), Style::default().fg(theme.text_muted)),
        Span::styled(" │ ", Style::default().fg(theme.text_dim)),
        Span::styled(state.uptime(), Style::default().fg(theme.text_muted)),
        Span::styled(selected_info, Style::default().fg(theme.warning)),
        Span::styled(context_info, Style::default().fg(theme.accent)),
    ]);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Send / upload / attach, dimmed when disabled.
fn control_spans(state: &AppState, theme: &ThemeColors) -> Vec<Span<'static>> {
    let controls = [
        ("send", state.controls.send),
        ("upload", state.controls.upload),
        ("attach", state.controls.attach),
    ];
    let mut spans = Vec::new();
    for (i, (name, enabled)) in controls.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let color = if enabled { theme.text } else { theme.text_dim };
        spans.push(Span::styled(name, Style::default().fg(color)));
    }
    spans
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
fn fit_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            out.push('…');
            return out;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("short.txt", 24), "short.txt");
        assert_eq!(fit_width("abcde", 5), "abcde");
        assert_eq!(fit_width("abcdefgh", 5), "abcd…");
        assert_eq!(fit_width("文件文件文件", 5), "文件…");
    }
}
