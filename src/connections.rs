use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::api::types::PersonSummary;
use crate::api::users::{self, PEOPLE_PAGE_SIZE};
use crate::api::{Fetcher, RequestOutcome};
use crate::lookup::Secondary;
use crate::validate::Identifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Followers,
    Following,
}

impl ListKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Followers => "Followers",
            Self::Following => "Following",
        }
    }
}

/// First page of followers; failures degrade to an empty list.
pub async fn fetch_followers(api: &impl Fetcher, id: &Identifier) -> Secondary<PersonSummary> {
    first_page(users::get_followers(api, id).await, ListKind::Followers)
}

/// First page of followed users; failures degrade to an empty list.
pub async fn fetch_following(api: &impl Fetcher, id: &Identifier) -> Secondary<PersonSummary> {
    first_page(users::get_following(api, id).await, ListKind::Following)
}

pub async fn fetch(api: &impl Fetcher, id: &Identifier, kind: ListKind) -> Secondary<PersonSummary> {
    match kind {
        ListKind::Followers => fetch_followers(api, id).await,
        ListKind::Following => fetch_following(api, id).await,
    }
}

fn first_page(outcome: RequestOutcome<Vec<PersonSummary>>, kind: ListKind) -> Secondary<PersonSummary> {
    match Secondary::from_outcome(outcome, kind.title()) {
        Secondary::Loaded(mut people) => {
            people.truncate(PEOPLE_PAGE_SIZE);
            Secondary::Loaded(people)
        }
        degraded => degraded,
    }
}

// ---------------------------------------------------------------------------
// Expandable panels
// ---------------------------------------------------------------------------

/// What the caller should do after a toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// The panel was open and is now closed.
    Collapse,
    /// The panel opened from already-loaded data.
    Show(Vec<PersonSummary>),
    /// The panel needs data; call [`Panels::loaded`] when it arrives.
    Fetch,
    /// The panel reopened while its list is still being fetched.
    Wait,
}

type PanelKey = (String, ListKind);

/// Open/closed state of the follower/following panels, keyed by identifier
/// and list kind, with the lists already loaded for the current card.
///
/// A panel is open as soon as it is toggled, even while its list is in
/// flight; each list is requested at most once per card.
#[derive(Debug, Default)]
pub struct Panels {
    expanded: HashSet<PanelKey>,
    loaded: HashMap<PanelKey, Vec<PersonSummary>>,
    in_flight: HashSet<PanelKey>,
}

impl Panels {
    pub fn toggle(&mut self, id: &str, kind: ListKind) -> PanelAction {
        let key = (id.to_string(), kind);
        if self.expanded.remove(&key) {
            return PanelAction::Collapse;
        }
        self.expanded.insert(key.clone());
        if let Some(people) = self.loaded.get(&key) {
            return PanelAction::Show(people.clone());
        }
        if self.in_flight.insert(key) {
            PanelAction::Fetch
        } else {
            PanelAction::Wait
        }
    }

    /// Store a fetched list. The panel shows it only if it is still open.
    pub fn loaded(&mut self, id: &str, kind: ListKind, people: Vec<PersonSummary>) {
        let key = (id.to_string(), kind);
        if !self.in_flight.remove(&key) && !self.expanded.contains(&key) {
            // Loaded without a toggle: open it.
            self.expanded.insert(key.clone());
        }
        self.loaded.insert(key, people);
    }

    pub fn is_expanded(&self, id: &str, kind: ListKind) -> bool {
        self.expanded.contains(&(id.to_string(), kind))
    }

    pub fn people(&self, id: &str, kind: ListKind) -> Option<&[PersonSummary]> {
        self.is_expanded(id, kind)
            .then(|| self.loaded.get(&(id.to_string(), kind)))
            .flatten()
            .map(Vec::as_slice)
    }

    /// Forget everything; a new card is being shown.
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.loaded.clear();
        self.in_flight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::ScriptedFetcher;
    use crate::api::{Failure, RequestOutcome};
    use serde_json::json;

    fn id() -> Identifier {
        Identifier::parse("octocat").unwrap()
    }

    fn person(login: &str) -> PersonSummary {
        PersonSummary {
            login: login.into(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn followers_request_fixed_page_and_cap() {
        let many: Vec<_> = (0..20).map(|i| json!({ "login": format!("u{i}") })).collect();
        let api = ScriptedFetcher::new().answer(
            "/users/octocat/followers?per_page=12",
            RequestOutcome::Success(json!(many)),
        );

        let list = fetch_followers(&api, &id()).await;
        assert_eq!(list.items().len(), PEOPLE_PAGE_SIZE);
        assert_eq!(api.requested(), vec!["/users/octocat/followers?per_page=12"]);
    }

    #[tokio::test]
    async fn following_failure_is_degraded_empty() {
        let api = ScriptedFetcher::new().answer(
            "/users/octocat/following?per_page=12",
            RequestOutcome::RateLimited,
        );

        let list = fetch_following(&api, &id()).await;
        assert!(list.items().is_empty());
        assert_eq!(list, Secondary::Degraded(Failure::RateLimited));
    }

    #[test]
    fn first_toggle_fetches_then_collapses_without_fetch() {
        let mut panels = Panels::default();
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Fetch);

        panels.loaded("octocat", ListKind::Followers, vec![person("a")]);
        assert!(panels.is_expanded("octocat", ListKind::Followers));

        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Collapse);
        assert!(panels.people("octocat", ListKind::Followers).is_none());

        assert_eq!(
            panels.toggle("octocat", ListKind::Followers),
            PanelAction::Show(vec![person("a")])
        );
        assert_eq!(panels.people("octocat", ListKind::Followers).unwrap().len(), 1);
    }

    #[test]
    fn toggles_while_loading_do_not_refetch() {
        let mut panels = Panels::default();
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Fetch);
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Collapse);
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Wait);
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Collapse);

        // The list arrives after the user closed the panel: cache it, stay closed.
        panels.loaded("octocat", ListKind::Followers, vec![person("a")]);
        assert!(!panels.is_expanded("octocat", ListKind::Followers));
        assert_eq!(
            panels.toggle("octocat", ListKind::Followers),
            PanelAction::Show(vec![person("a")])
        );
    }

    #[test]
    fn reset_forgets_lists_in_flight() {
        let mut panels = Panels::default();
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Fetch);
        panels.reset();
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Fetch);
    }

    #[test]
    fn panels_are_keyed_by_identifier_and_kind() {
        let mut panels = Panels::default();
        panels.loaded("octocat", ListKind::Followers, vec![]);
        assert!(!panels.is_expanded("octocat", ListKind::Following));
        assert!(!panels.is_expanded("torvalds", ListKind::Followers));
        assert_eq!(panels.toggle("octocat", ListKind::Following), PanelAction::Fetch);
    }

    #[test]
    fn reset_forgets_loaded_lists() {
        let mut panels = Panels::default();
        panels.loaded("octocat", ListKind::Followers, vec![person("a")]);
        panels.reset();
        assert_eq!(panels.toggle("octocat", ListKind::Followers), PanelAction::Fetch);
    }
}
