use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::api::types::PersonSummary;
use crate::connections::ListKind;
use crate::sanitize::terminal_text;

/// An expanded followers/following list.
pub struct PeoplePanel<'a> {
    pub kind: ListKind,
    pub people: &'a [PersonSummary],
}

impl<'a> PeoplePanel<'a> {
    pub fn new(kind: ListKind, people: &'a [PersonSummary]) -> Self {
        Self { kind, people }
    }
}

impl Widget for PeoplePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}) ", self.kind.title(), self.people.len()))
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.people.is_empty() {
            buf.set_string(
                inner.x + 1,
                inner.y,
                "Nobody to show",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let lines: Vec<Line<'_>> = self
            .people
            .iter()
            .map(|p| Line::from(Span::raw(format!(" @{}", terminal_text(Some(&p.login))))))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
