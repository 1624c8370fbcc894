use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::app::App;
use crate::lookup::{ORGS_SHOWN, REPOS_SHOWN, ViewModel};
use crate::render::format_date;
use crate::sanitize::terminal_text;

/// The main pane: the current profile card, the current error, or a hint.
pub struct CardView<'a> {
    pub app: &'a App,
}

impl<'a> CardView<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for CardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(ref vm) = self.app.view {
            ProfileCard::new(vm).render(area, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" ghcard ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let (msg, style) = match (&self.app.error, self.app.loading()) {
            (_, true) => ("Loading...".to_string(), Style::default().fg(Color::DarkGray)),
            (Some(err), false) => (err.to_string(), Style::default().fg(Color::Red)),
            (None, false) => (
                "Type a GitHub username and press Enter (? for help)".to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        };
        Paragraph::new(Span::styled(msg, style))
            .wrap(Wrap { trim: true })
            .render(inner.inner(ratatui::layout::Margin::new(1, 0)), buf);
    }
}

/// A rendered profile: identity, counts, details, top repos and orgs.
pub struct ProfileCard<'a> {
    pub vm: &'a ViewModel,
}

impl<'a> ProfileCard<'a> {
    pub fn new(vm: &'a ViewModel) -> Self {
        Self { vm }
    }
}

impl Widget for ProfileCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = &self.vm.profile;
        let login = terminal_text(Some(&p.login));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" @{login} "))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        let [info_area, lists_area] =
            Layout::vertical([Constraint::Length(12), Constraint::Min(1)]).areas(inner);

        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);
        let bold = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        // -- Info section --
        let mut lines = vec![
            Line::from(Span::styled(terminal_text(Some(p.display_name())), bold)),
            Line::from(Span::styled(format!("@{login}"), label)),
            Line::from(""),
            Line::from(vec![
                Span::styled(p.followers.to_string(), bold),
                Span::styled(" Followers  ", label),
                Span::styled(p.following.to_string(), bold),
                Span::styled(" Following  ", label),
                Span::styled(p.public_repos.to_string(), bold),
                Span::styled(" Public repos  ", label),
                Span::styled(p.public_gists.to_string(), bold),
                Span::styled(" Gists", label),
            ]),
            detail_line("Bio", terminal_text(p.bio.as_deref()), label, value),
            detail_line("Location", terminal_text(p.location.as_deref()), label, value),
            detail_line("Member since", format_date(p.created_at.as_ref()), label, value),
        ];
        if let Some(ref company) = p.company {
            lines.push(detail_line("Company", terminal_text(Some(company)), label, value));
        }
        if let Some(ref blog) = p.blog {
            lines.push(detail_line("Blog", terminal_text(Some(blog)), label, value));
        }
        if let Some(ref handle) = p.twitter_username {
            lines.push(detail_line(
                "Twitter",
                format!("@{}", terminal_text(Some(handle))),
                label,
                value,
            ));
        }
        if let Some(ref url) = p.html_url {
            lines.push(Line::from(Span::styled(
                terminal_text(Some(url)),
                Style::default().fg(Color::Blue),
            )));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(info_area, buf);

        // -- Repositories and organizations --
        let section = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();

        let title = match self.vm.facet {
            Some(ref facet) => format!("Top repositories ({})", terminal_text(Some(facet))),
            None => "Top repositories".to_string(),
        };
        lines.push(Line::from(Span::styled(title, section)));
        let repos = self.vm.repos.items();
        if repos.is_empty() {
            lines.push(Line::from(Span::styled("  No repositories to show", label)));
        }
        for repo in repos.iter().take(REPOS_SHOWN) {
            let mut spans = vec![
                Span::styled(format!("  {}", terminal_text(Some(&repo.name))), bold),
                Span::styled(
                    format!("  \u{2605} {}  \u{2442} {}", repo.stargazers_count, repo.forks_count),
                    Style::default().fg(Color::Yellow),
                ),
            ];
            if let Some(ref lang) = repo.language {
                spans.push(Span::styled(format!("  {}", terminal_text(Some(lang))), label));
            }
            lines.push(Line::from(spans));
            if let Some(ref desc) = repo.description {
                lines.push(Line::from(Span::styled(
                    format!("    {}", terminal_text(Some(desc))),
                    value,
                )));
            }
        }

        let orgs = self.vm.orgs.items();
        if !orgs.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Organizations", section)));
            let names: Vec<String> = orgs
                .iter()
                .take(ORGS_SHOWN)
                .map(|o| terminal_text(Some(&o.login)))
                .collect();
            lines.push(Line::from(Span::styled(format!("  {}", names.join(", ")), value)));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(lists_area, buf);
    }
}

fn detail_line<'a>(name: &'a str, text: String, label: Style, value: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{name}: "), label),
        Span::styled(text, value),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ProfileRecord;
    use crate::lookup::Secondary;
    use crate::validate::Identifier;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn card_shows_counts_and_placeholders() {
        let vm = ViewModel {
            identifier: Identifier::parse("octocat").unwrap(),
            profile: ProfileRecord {
                login: "octocat".into(),
                followers: 4000,
                ..Default::default()
            },
            repos: Secondary::Loaded(vec![]),
            orgs: Secondary::Loaded(vec![]),
            facet: None,
            languages: vec![],
        };
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        ProfileCard::new(&vm).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("4000 Followers"));
        assert!(text.contains("Bio: Not provided"));
        assert!(text.contains("No repositories to show"));
    }

    #[test]
    fn card_shows_gists_blog_and_twitter() {
        let vm = ViewModel {
            identifier: Identifier::parse("octocat").unwrap(),
            profile: ProfileRecord {
                login: "octocat".into(),
                public_gists: 8,
                blog: Some("https://github.blog".into()),
                twitter_username: Some("github".into()),
                ..Default::default()
            },
            repos: Secondary::Loaded(vec![]),
            orgs: Secondary::Loaded(vec![]),
            facet: None,
            languages: vec![],
        };
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        ProfileCard::new(&vm).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("8 Gists"));
        assert!(text.contains("Blog: https://github.blog"));
        assert!(text.contains("Twitter: @github"));
    }

    #[test]
    fn card_strips_terminal_escapes() {
        let vm = ViewModel {
            identifier: Identifier::parse("octocat").unwrap(),
            profile: ProfileRecord {
                login: "octocat".into(),
                name: Some("evil\u{1b}[31mname".into()),
                ..Default::default()
            },
            repos: Secondary::Loaded(vec![]),
            orgs: Secondary::Loaded(vec![]),
            facet: None,
            languages: vec![],
        };
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        ProfileCard::new(&vm).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("evil[31mname"));
        assert!(!text.contains('\u{1b}'));
    }
}
