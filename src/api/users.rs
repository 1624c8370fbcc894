use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::api::types::{OrganizationSummary, PersonSummary, ProfileRecord, RepositorySummary};
use crate::api::{Fetcher, RequestOutcome};
use crate::validate::Identifier;

/// Repositories requested per lookup, sorted by stars.
pub const REPO_PAGE_SIZE: u32 = 100;

/// Fixed page size for follower/following lists; no further pages are read.
pub const PEOPLE_PAGE_SIZE: usize = 12;

/// Percent-encoding set for a path segment (encode everything except unreserved chars).
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn user_path(id: &Identifier) -> String {
    format!("/users/{}", utf8_percent_encode(id.as_str(), SEGMENT_ENCODE_SET))
}

/// Look up a user profile.
pub async fn get_user(api: &impl Fetcher, id: &Identifier) -> RequestOutcome<ProfileRecord> {
    api.fetch(&user_path(id)).await.decode()
}

/// A user's public repositories, most-starred first.
pub async fn get_repos(
    api: &impl Fetcher,
    id: &Identifier,
) -> RequestOutcome<Vec<RepositorySummary>> {
    let path = format!("{}/repos?sort=stars&per_page={REPO_PAGE_SIZE}", user_path(id));
    api.fetch(&path).await.decode()
}

/// Organizations the user publicly belongs to.
pub async fn get_orgs(
    api: &impl Fetcher,
    id: &Identifier,
) -> RequestOutcome<Vec<OrganizationSummary>> {
    api.fetch(&format!("{}/orgs", user_path(id))).await.decode()
}

/// First page of a user's followers.
pub async fn get_followers(
    api: &impl Fetcher,
    id: &Identifier,
) -> RequestOutcome<Vec<PersonSummary>> {
    let path = format!("{}/followers?per_page={PEOPLE_PAGE_SIZE}", user_path(id));
    api.fetch(&path).await.decode()
}

/// First page of the users someone follows.
pub async fn get_following(
    api: &impl Fetcher,
    id: &Identifier,
) -> RequestOutcome<Vec<PersonSummary>> {
    let path = format!("{}/following?per_page={PEOPLE_PAGE_SIZE}", user_path(id));
    api.fetch(&path).await.decode()
}
