use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::GitHubClient;
use crate::command::{self, Command};
use crate::config::AppConfig;
use crate::connections::{self, ListKind, PanelAction, Panels};
use crate::debounce::Debouncer;
use crate::event::{AppEvent, Event, EventHandler};
use crate::history::{FileStorage, HistoryStore};
use crate::lookup::{self, DisplayError, ViewModel};
use crate::sanitize;
use crate::share::{self, ShareOutcome};
use crate::ui;

// ---------------------------------------------------------------------------
// App mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    /// Typing into the lookup box.
    Input,
    Command,
}

/// A dismissible overlay message.
#[derive(Debug, Clone)]
pub struct Popup {
    pub title: &'static str,
    pub body: String,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,
    pub mode: AppMode,

    // Input state
    pub input: String,
    pub command_input: String,
    debouncer: Debouncer,

    // Card state; a new result replaces all of it.
    pub view: Option<ViewModel>,
    pub error: Option<DisplayError>,
    pub panels: Panels,
    pub facet: Option<String>,

    // History
    pub history: HistoryStore<FileStorage>,
    pub show_history: bool,
    pub history_selected: usize,

    client: GitHubClient,

    // Status
    pub status_message: Option<String>,
    pub popup: Option<Popup>,
    pub show_help: bool,
    in_flight: usize,
}

impl App {
    pub fn new(config: AppConfig, client: GitHubClient, history: HistoryStore<FileStorage>) -> Self {
        Self {
            running: true,
            events: EventHandler::new(config.tick_rate_fps),
            debouncer: Debouncer::new(config.debounce()),
            config,
            mode: AppMode::Input,
            input: String::new(),
            command_input: String::new(),
            view: None,
            error: None,
            panels: Panels::default(),
            facet: None,
            history,
            show_history: false,
            history_selected: 0,
            client,
            status_message: None,
            popup: None,
            show_help: false,
            in_flight: 0,
        }
    }

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| ui::draw(frame, &self))?;
            match self.events.next().await? {
                Event::Tick => {}
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key) = event
                        && key.kind == crossterm::event::KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }
        Ok(())
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        // Overlays swallow the next key.
        if self.popup.is_some() || self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q' | '?')) {
                self.popup = None;
                self.show_help = false;
            }
            return;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Input => self.handle_input_key(key),
            AppMode::Command => self.handle_command_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.show_history {
                    self.show_history = false;
                } else {
                    self.events.send(AppEvent::Quit);
                }
            }
            KeyCode::Char('/' | '@' | 'i') => {
                self.mode = AppMode::Input;
                self.input.clear();
            }
            KeyCode::Char(':') => {
                self.mode = AppMode::Command;
                self.command_input.clear();
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('h') => self.toggle_history(),
            KeyCode::Char('j') | KeyCode::Down => self.move_history_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_history_selection(-1),
            KeyCode::Enter => self.replay_selected_history(),
            KeyCode::Char('f') => self.toggle_people(ListKind::Followers),
            KeyCode::Char('g') => self.toggle_people(ListKind::Following),
            KeyCode::Char('l') => self.cycle_facet(),
            KeyCode::Char('s') => self.share(),
            KeyCode::Char('o') => self.open_profile(),
            KeyCode::Char('x') => self.clear_history(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.debouncer.cancel();
                self.input.clear();
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => {
                self.debouncer.cancel();
                let input = self.input.trim().to_string();
                if !input.is_empty() {
                    self.events.send(AppEvent::Lookup { input });
                    self.input.clear();
                }
                self.mode = AppMode::Normal;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.schedule_live_lookup();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.schedule_live_lookup();
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.command_input.clear();
            }
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
                self.execute_command();
            }
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(c) => {
                self.command_input.push(c);
            }
            _ => {}
        }
    }

    /// Restart the quiet-period timer; only inputs long enough trigger a
    /// live lookup.
    fn schedule_live_lookup(&mut self) {
        self.debouncer.cancel();
        let value = self.input.trim();
        if value.chars().count() >= self.config.live_search_min_chars {
            let event = Event::App(Box::new(AppEvent::Lookup {
                input: value.to_string(),
            }));
            self.debouncer.schedule(self.events.sender(), event);
        }
    }

    // -- Command execution --------------------------------------------------

    fn execute_command(&mut self) {
        let input = std::mem::take(&mut self.command_input);
        match command::parse_command(&input) {
            Some(Command::User(input)) => self.events.send(AppEvent::Lookup { input }),
            Some(Command::Language(facet)) => self.set_facet(facet),
            Some(Command::Followers) => self.toggle_people(ListKind::Followers),
            Some(Command::Following) => self.toggle_people(ListKind::Following),
            Some(Command::History) => self.toggle_history(),
            Some(Command::ClearHistory) => self.clear_history(),
            Some(Command::Share) => self.share(),
            Some(Command::Open) => self.open_profile(),
            Some(Command::Help) => self.show_help = true,
            Some(Command::Quit) => self.events.send(AppEvent::Quit),
            None => {
                self.status_message = Some(format!(
                    "Unknown command: {}",
                    sanitize::terminal_text(Some(&input))
                ));
            }
        }
    }

    // -- History ------------------------------------------------------------

    fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        self.history_selected = 0;
    }

    fn move_history_selection(&mut self, delta: isize) {
        if !self.show_history {
            return;
        }
        let len = self.history.list().len();
        if len == 0 {
            return;
        }
        self.history_selected = self
            .history_selected
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    fn replay_selected_history(&mut self) {
        if !self.show_history {
            return;
        }
        if let Some(input) = self.history.list().get(self.history_selected).cloned() {
            self.events.send(AppEvent::Lookup { input });
        }
    }

    fn clear_history(&mut self) {
        self.history.clear();
        self.history_selected = 0;
        self.status_message = Some("History cleared".to_string());
    }

    // -- Card actions -------------------------------------------------------

    fn current_identifier(&self) -> Option<String> {
        self.view.as_ref().map(|vm| vm.identifier.to_string())
    }

    fn toggle_people(&mut self, kind: ListKind) {
        let Some(identifier) = self.current_identifier() else {
            return;
        };
        match self.panels.toggle(&identifier, kind) {
            PanelAction::Collapse | PanelAction::Show(_) | PanelAction::Wait => {}
            PanelAction::Fetch => self.events.send(AppEvent::FetchPeople { identifier, kind }),
        }
    }

    fn set_facet(&mut self, facet: Option<String>) {
        self.facet = facet;
        if let Some(input) = self.current_identifier() {
            self.events.send(AppEvent::Lookup { input });
        }
    }

    /// Step through "all languages" and the languages of the current card.
    fn cycle_facet(&mut self) {
        let Some(vm) = &self.view else {
            return;
        };
        let options: Vec<Option<String>> = std::iter::once(None)
            .chain(vm.languages.iter().cloned().map(Some))
            .collect();
        let current = options
            .iter()
            .position(|o| {
                o.as_deref().map(str::to_ascii_lowercase)
                    == self.facet.as_deref().map(str::to_ascii_lowercase)
            })
            .unwrap_or(0);
        let next = options[(current + 1) % options.len()].clone();
        self.set_facet(next);
    }

    fn share(&mut self) {
        let Some(vm) = &self.view else {
            return;
        };
        let text = share::share_text(&vm.profile);
        match share::copy_to_clipboard(&text) {
            ShareOutcome::Copied => {
                self.status_message = Some("Share text copied to clipboard".to_string());
            }
            ShareOutcome::Manual(text) => {
                self.popup = Some(Popup {
                    title: " Copy manually ",
                    body: sanitize::terminal_text(Some(&text)),
                });
            }
        }
    }

    fn open_profile(&mut self) {
        let Some(vm) = &self.view else {
            return;
        };
        let Some(url) = sanitize::safe_url(vm.profile.html_url.as_deref()) else {
            self.status_message = Some("No profile URL".to_string());
            return;
        };
        if let Err(e) = open::that(url) {
            tracing::warn!("failed to open browser: {e}");
            self.status_message = Some("Could not open a browser".to_string());
        }
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.debouncer.cancel();
                self.running = false;
            }
            AppEvent::Lookup { input } => self.start_lookup(&input),
            AppEvent::FetchPeople { identifier, kind } => self.dispatch_people(identifier, kind),
            AppEvent::LookupLoaded(result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                // Whatever finished last owns the card.
                self.panels.reset();
                match *result {
                    Ok(vm) => {
                        self.view = Some(vm);
                        self.error = None;
                    }
                    Err(e) => {
                        self.view = None;
                        self.error = Some(e);
                    }
                }
            }
            AppEvent::PeopleLoaded {
                identifier,
                kind,
                result,
            } => {
                if self.current_identifier().as_deref() == Some(identifier.as_str()) {
                    if result.is_degraded() {
                        self.status_message =
                            Some(format!("Could not load {}", kind.title().to_lowercase()));
                    }
                    self.panels.loaded(&identifier, kind, result.items().to_vec());
                }
            }
        }
    }

    // -- API dispatch -------------------------------------------------------

    fn start_lookup(&mut self, input: &str) {
        self.status_message = None;
        let id = match lookup::prepare(&mut self.history, input) {
            Ok(id) => id,
            Err(e) => {
                self.view = None;
                self.error = Some(e);
                self.panels.reset();
                return;
            }
        };

        self.in_flight += 1;
        let client = self.client.clone();
        let sender = self.events.sender();
        let facet = self.facet.clone();
        tokio::spawn(async move {
            let result = lookup::assemble(&client, id, facet).await;
            let _ = sender.send(Event::App(Box::new(AppEvent::LookupLoaded(Box::new(result)))));
        });
    }

    fn dispatch_people(&self, identifier: String, kind: ListKind) {
        let Ok(id) = crate::validate::Identifier::parse(&identifier) else {
            return;
        };
        let client = self.client.clone();
        let sender = self.events.sender();
        tokio::spawn(async move {
            let result = connections::fetch(&client, &id, kind).await;
            let _ = sender.send(Event::App(Box::new(AppEvent::PeopleLoaded {
                identifier,
                kind,
                result,
            })));
        });
    }
}
