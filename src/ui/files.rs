use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::state::AppState;
use crate::theme::ThemeColors;

/// Lines of content shown per card before eliding.
const PREVIEW_LINES: usize = 8;

/// Render one card per uploaded file.
pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.text_dim))
        .title(Span::styled(" files ", Style::default().fg(theme.text_muted)));

    let mut lines: Vec<Line> = Vec::new();

    for (i, card) in state.file_cards.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        let mut title = vec![
            Span::styled(format!(" {}. ", i + 1), Style::default().fg(theme.text_dim)),
            Span::styled(
                card.filename.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(original) = &card.original_name {
            title.push(Span::styled(
                format!(" (from {})", original),
                Style::default().fg(theme.text_muted),
            ));
        }
        lines.push(Line::from(title));
        lines.push(Line::from(vec![
            Span::styled(format!("    {}", card.mimetype), Style::default().fg(theme.text_muted)),
            Span::styled(
                if card.open_url.is_empty() { String::new() } else { format!("  [Open: /open {}]", i + 1) },
                Style::default().fg(theme.primary_dim),
            ),
        ]));

        let body_style = if card.failed {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.text)
        };
        let total = card.body.lines().count();
        for body_line in card.body.lines().take(PREVIEW_LINES) {
            lines.push(Line::from(Span::styled(format!("    {}", body_line), body_style)));
        }
        if total > PREVIEW_LINES {
            lines.push(Line::from(Span::styled(
                format!("    … {} more lines", total - PREVIEW_LINES),
                Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
