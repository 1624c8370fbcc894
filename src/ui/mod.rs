pub mod card;
pub mod command_bar;
pub mod help;
pub mod history;
pub mod input;
pub mod people;
pub mod popup;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::app::{App, AppMode};
use crate::connections::ListKind;

use card::CardView;
use command_bar::CommandBar;
use help::HelpView;
use history::HistoryPanel;
use input::LookupBox;
use people::PeoplePanel;
use popup::PopupView;
use status_bar::StatusBar;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: lookup box + main content + status bar + optional command bar
    let bottom_height = if app.mode == AppMode::Command { 2 } else { 1 };

    let [input_area, main_area, bottom_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(bottom_height),
    ])
    .areas(area);

    frame.render_widget(LookupBox::new(app), input_area);

    if app.mode == AppMode::Command {
        let [status_area, cmd_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(bottom_area);
        frame.render_widget(StatusBar::new(app), status_area);
        frame.render_widget(CommandBar::new(app), cmd_area);
    } else {
        frame.render_widget(StatusBar::new(app), bottom_area);
    }

    // Side column for history and any expanded people panels.
    let identifier = app.view.as_ref().map(|vm| vm.identifier.as_str());
    let panels: Vec<(ListKind, &[crate::api::types::PersonSummary])> =
        [ListKind::Followers, ListKind::Following]
            .into_iter()
            .filter_map(|kind| {
                identifier
                    .and_then(|id| app.panels.people(id, kind))
                    .map(|people| (kind, people))
            })
            .collect();
    let history = app.show_history.then(|| app.history.list());

    let side_count = panels.len() + usize::from(history.is_some());
    let card_area = if side_count == 0 {
        main_area
    } else {
        let [card_area, side_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(main_area);
        let slots = Layout::vertical(vec![Constraint::Ratio(1, side_count as u32); side_count])
            .split(side_area);

        let mut slot = slots.iter();
        if let Some(entries) = history
            && let Some(area) = slot.next()
        {
            frame.render_widget(HistoryPanel::new(entries, app.history_selected), *area);
        }
        for (kind, people) in panels {
            if let Some(area) = slot.next() {
                frame.render_widget(PeoplePanel::new(kind, people), *area);
            }
        }
        card_area
    };

    frame.render_widget(CardView::new(app), card_area);

    if app.show_help {
        frame.render_widget(HelpView::new(), frame.area());
    }

    // Popup overlay (renders on top of everything)
    if let Some(ref popup) = app.popup {
        frame.render_widget(PopupView::new(popup.title, &popup.body), frame.area());
    }
}
