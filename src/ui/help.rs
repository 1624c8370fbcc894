use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Help overlay showing keybindings and commands.
#[derive(Default)]
pub struct HelpView;

impl HelpView {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for HelpView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Center a panel that's 60 wide, 26 tall (or fit to area)
        let width = 60u16.min(area.width.saturating_sub(4));
        let height = 26u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Help - Keybindings ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(panel);
        block.render(panel, buf);

        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(Color::White);
        let section_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let bindings: Vec<Line<'_>> = vec![
            Line::from(Span::styled("Lookup", section_style)),
            binding_line("/ @ i", "Type a username", key_style, desc_style),
            binding_line("Enter", "Look up now", key_style, desc_style),
            binding_line("Esc", "Leave the input box", key_style, desc_style),
            Line::from(""),
            Line::from(Span::styled("Card", section_style)),
            binding_line("f / g", "Toggle followers / following", key_style, desc_style),
            binding_line("l", "Cycle language filter", key_style, desc_style),
            binding_line("s", "Share profile", key_style, desc_style),
            binding_line("o", "Open profile in browser", key_style, desc_style),
            Line::from(""),
            Line::from(Span::styled("History", section_style)),
            binding_line("h", "Show / hide history", key_style, desc_style),
            binding_line("j/k", "Move selection", key_style, desc_style),
            binding_line("Enter", "Look up selected entry", key_style, desc_style),
            binding_line("x", "Clear history", key_style, desc_style),
            Line::from(""),
            Line::from(Span::styled("Commands", section_style)),
            binding_line(":user NAME", "Look up a user", key_style, desc_style),
            binding_line(":lang LANG", "Filter repos (all resets)", key_style, desc_style),
            binding_line("?", "This help screen", key_style, desc_style),
            binding_line("q / Ctrl-C", "Quit", key_style, desc_style),
        ];

        Paragraph::new(bindings).render(inner, buf);
    }
}

fn binding_line<'a>(key: &'a str, desc: &'a str, key_style: Style, desc_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {key:<12}"), key_style),
        Span::styled(desc, desc_style),
    ])
}
