use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::sanitize::terminal_text;

/// Recent lookups, most recent first, with the selected entry highlighted.
pub struct HistoryPanel<'a> {
    pub entries: &'a [String],
    pub selected_index: usize,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(entries: &'a [String], selected_index: usize) -> Self {
        Self {
            entries,
            selected_index,
        }
    }
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" History ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            buf.set_string(
                inner.x + 1,
                inner.y,
                "No searches yet",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let lines: Vec<Line<'_>> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == self.selected_index {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(format!(" {} ", terminal_text(Some(entry))), style))
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
