use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, AppMode};

/// A simple single-line text input renderer.
///
/// Renders the prompt + text content, with a cursor indicator at the end.
pub struct TextInput<'a> {
    pub prompt: &'a str,
    pub text: &'a str,
    pub style: Style,
    pub cursor: bool,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str, text: &'a str) -> Self {
        Self {
            prompt,
            text,
            style: Style::default().fg(Color::White),
            cursor: true,
        }
    }

    pub fn cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let cursor = if self.cursor { "\u{2588}" } else { "" };
        let display = format!("{}{}{cursor}", self.prompt, self.text);
        let visible = tail_fitting(&display, area.width as usize);
        buf.set_string(area.x, area.y, visible, self.style);
    }
}

/// The rightmost slice of `text` that fits in `max_width` terminal columns.
fn tail_fitting(text: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (idx, ch) in text.char_indices().rev() {
        width += ch.width().unwrap_or(0);
        if width > max_width {
            return &text[idx + ch.len_utf8()..];
        }
    }
    text
}

/// The bordered username box at the top of the screen.
pub struct LookupBox<'a> {
    pub app: &'a App,
}

impl<'a> LookupBox<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for LookupBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.app.mode == AppMode::Input;
        let border = if focused { Color::Yellow } else { Color::DarkGray };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" GitHub username ")
            .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.app.input.is_empty() && !focused {
            buf.set_string(
                inner.x,
                inner.y,
                "@ press / to search",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        TextInput::new("@ ", &self.app.input)
            .cursor(focused)
            .render(inner, buf);
    }
}
