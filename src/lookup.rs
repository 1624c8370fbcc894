use serde::Serialize;
use thiserror::Error;

use crate::api::types::{OrganizationSummary, ProfileRecord, RepositorySummary};
use crate::api::{Failure, Fetcher, RequestOutcome, users};
use crate::history::{HistoryStore, Storage};
use crate::validate::{Identifier, normalize_input};

/// Repositories kept in the view model after filtering.
pub const REPOS_KEPT: usize = 6;
/// Repositories a card shows.
pub const REPOS_SHOWN: usize = 3;
/// Organizations kept and shown.
pub const ORGS_SHOWN: usize = 4;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A lookup failure as the user sees it: one fixed message per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("Invalid username. Use only letters, digits and hyphens (39 characters max).")]
    Validation,
    #[error("User not found. Check the username.")]
    NotFound,
    #[error("Request limit reached. Try again later.")]
    RateLimited,
    #[error("The request timed out. Check your connection.")]
    Timeout,
    #[error("Connection error. Check your network.")]
    Network,
    #[error("Something went wrong during the search. Try again.")]
    Http(u16),
}

impl From<Failure> for DisplayError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::NotFound => Self::NotFound,
            Failure::RateLimited => Self::RateLimited,
            Failure::OtherError(status) => Self::Http(status),
            Failure::TimedOut => Self::Timeout,
            Failure::NetworkError => Self::Network,
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// A best-effort list: either what the API returned, or the reason it could
/// not be loaded. A degraded list reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Secondary<T> {
    Loaded(Vec<T>),
    Degraded(Failure),
}

impl<T> Secondary<T> {
    pub fn from_outcome(outcome: RequestOutcome<Vec<T>>, what: &str) -> Self {
        match outcome.into_result() {
            Ok(items) => Self::Loaded(items),
            Err(failure) => {
                tracing::warn!(?failure, "{what} unavailable, showing none");
                Self::Degraded(failure)
            }
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            Self::Degraded(_) => &[],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    fn map_items(self, f: impl FnOnce(Vec<T>) -> Vec<T>) -> Self {
        match self {
            Self::Loaded(items) => Self::Loaded(f(items)),
            degraded => degraded,
        }
    }
}

/// Everything one profile card needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub identifier: Identifier,
    pub profile: ProfileRecord,
    pub repos: Secondary<RepositorySummary>,
    pub orgs: Secondary<OrganizationSummary>,
    /// Language the repo list was filtered by.
    pub facet: Option<String>,
    /// Languages present in the unfiltered repo list, for picking a facet.
    pub languages: Vec<String>,
}

fn matches_facet(repo: &RepositorySummary, facet: Option<&str>) -> bool {
    match facet {
        None => true,
        Some(facet) => repo
            .language
            .as_deref()
            .is_some_and(|lang| lang.eq_ignore_ascii_case(facet)),
    }
}

fn languages_of(repos: &[RepositorySummary]) -> Vec<String> {
    let mut langs: Vec<String> = repos.iter().filter_map(|r| r.language.clone()).collect();
    langs.sort_by_key(|l| l.to_ascii_lowercase());
    langs.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    langs
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Validate raw input and record it in the history.
///
/// The attempt is recorded before anything is fetched, so failed lookups
/// still land in the history. Invalid input touches neither the history nor
/// the network.
pub fn prepare<S: Storage>(
    history: &mut HistoryStore<S>,
    raw: &str,
) -> Result<Identifier, DisplayError> {
    let id = Identifier::parse(normalize_input(raw))?;
    history.record(id.as_str());
    Ok(id)
}

/// Fetch the profile, then repos and orgs concurrently, and build the card.
pub async fn assemble(
    api: &impl Fetcher,
    id: Identifier,
    facet: Option<String>,
) -> Result<ViewModel, DisplayError> {
    tracing::info!(%id, ?facet, "looking up profile");

    let profile = users::get_user(api, &id)
        .await
        .into_result()
        .map_err(DisplayError::from)?;

    let (repos, orgs) = tokio::join!(users::get_repos(api, &id), users::get_orgs(api, &id));

    let repos = Secondary::from_outcome(repos, "repositories");
    let languages = languages_of(repos.items());
    let repos = repos.map_items(|items| {
        items
            .into_iter()
            .filter(|r| matches_facet(r, facet.as_deref()))
            .take(REPOS_KEPT)
            .collect()
    });
    let orgs = Secondary::from_outcome(orgs, "organizations")
        .map_items(|items| items.into_iter().take(ORGS_SHOWN).collect());

    Ok(ViewModel {
        identifier: id,
        profile,
        repos,
        orgs,
        facet,
        languages,
    })
}

/// Full lookup: [`prepare`] then [`assemble`].
pub async fn lookup<S: Storage>(
    api: &impl Fetcher,
    history: &mut HistoryStore<S>,
    raw: &str,
    facet: Option<&str>,
) -> Result<ViewModel, DisplayError> {
    let id = prepare(history, raw)?;
    assemble(api, id, facet.map(str::to_owned)).await
}
