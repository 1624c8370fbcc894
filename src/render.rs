//! HTML rendering of lookups.
//!
//! Markup structure comes from maud templates. Every string that originates
//! from the API or the user goes through [`sanitize::escape`] and is inserted
//! pre-escaped; URLs additionally have to pass [`sanitize::safe_url`] before
//! they reach an attribute.

use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::api::types::PersonSummary;
use crate::connections::ListKind;
use crate::lookup::{DisplayError, ORGS_SHOWN, REPOS_SHOWN, ViewModel};
use crate::sanitize::{self, PLACEHOLDER};

/// Date format for "member since" (fr-FR short date).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const PAGE_CSS: &str = r#"
body{font-family:system-ui,sans-serif;background:#0d1117;color:#e6edf3;display:flex;justify-content:center;padding:2rem}
.card{max-width:420px;padding:1.5rem;border-radius:12px;background:#161b22;text-align:center}
.avatar{width:120px;height:120px;border-radius:50%}
.username{color:#8b949e}
.count-infos{list-style:none;padding:0;text-align:left}
.count-infos span{font-weight:600}
.repos ul,.orgs ul,.people ul,.history ul{list-style:none;padding:0;text-align:left}
.orgs img,.people img{width:32px;height:32px;border-radius:6px;vertical-align:middle}
.erreur{color:#f85149}
a{color:#58a6ff}
"#;

/// Sanitized text, ready to splice into markup.
fn esc(text: Option<impl AsRef<str>>) -> PreEscaped<String> {
    PreEscaped(sanitize::escape(text.as_ref().map(AsRef::as_ref)))
}

pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map_or_else(|| PLACEHOLDER.to_string(), |d| d.format(DATE_FORMAT).to_string())
}

/// A standalone HTML document around `body`.
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (esc(Some(title))) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body { (body) }
        }
    }
}

/// The profile card: identity, counts, bio, top repositories, organizations.
pub fn card(vm: &ViewModel) -> Markup {
    let p = &vm.profile;
    let login = Some(p.login.as_str());
    let repos = vm.repos.items();
    let orgs = vm.orgs.items();

    html! {
        div class="card" {
            @if let Some(avatar) = sanitize::safe_url(p.avatar_url.as_deref()) {
                img src=(esc(Some(avatar))) alt={ "Avatar of " (esc(login)) } class="avatar" loading="lazy";
            }
            h2 { (esc(Some(p.display_name()))) }
            div class="username" { "@" (esc(login)) }
            ul class="count-infos" {
                li { span { "Followers" } ": " (p.followers) }
                li { span { "Following" } ": " (p.following) }
                li { span { "Public repos" } ": " (p.public_repos) }
                li { span { "Public gists" } ": " (p.public_gists) }
                li { span { "Bio" } ": " (esc(p.bio.as_deref())) }
                li { span { "Location" } ": " (esc(p.location.as_deref())) }
                li { span { "Member since" } ": " (format_date(p.created_at.as_ref())) }
                @if p.company.is_some() {
                    li { span { "Company" } ": " (esc(p.company.as_deref())) }
                }
                @if let Some(blog) = &p.blog {
                    li {
                        span { "Blog" } ": "
                        @if let Some(url) = sanitize::safe_url(Some(blog.as_str())) {
                            a href=(esc(Some(url))) target="_blank" rel="noopener noreferrer" { (esc(Some(url))) }
                        } @else {
                            (esc(Some(blog)))
                        }
                    }
                }
                @if let Some(handle) = &p.twitter_username {
                    li { span { "Twitter" } ": @" (esc(Some(handle))) }
                }
            }
            @if let Some(url) = sanitize::safe_url(p.html_url.as_deref()) {
                a href=(esc(Some(url))) target="_blank" rel="noopener noreferrer" class="profile-link" {
                    "View profile"
                }
            }
            section class="repos" {
                h3 {
                    "Top repositories"
                    @if let Some(facet) = &vm.facet {
                        " (" (esc(Some(facet))) ")"
                    }
                }
                @if repos.is_empty() {
                    p class="empty" { "No repositories to show" }
                } @else {
                    ul {
                        @for repo in repos.iter().take(REPOS_SHOWN) {
                            li {
                                @if let Some(url) = sanitize::safe_url(repo.html_url.as_deref()) {
                                    a href=(esc(Some(url))) target="_blank" rel="noopener noreferrer" {
                                        (esc(Some(&repo.name)))
                                    }
                                } @else {
                                    (esc(Some(&repo.name)))
                                }
                                " ★ " (repo.stargazers_count)
                                " ⑂ " (repo.forks_count)
                                @if let Some(lang) = &repo.language {
                                    " · " (esc(Some(lang)))
                                }
                                @if repo.description.is_some() {
                                    div class="description" { (esc(repo.description.as_deref())) }
                                }
                            }
                        }
                    }
                }
            }
            @if !orgs.is_empty() {
                section class="orgs" {
                    h3 { "Organizations" }
                    ul {
                        @for org in orgs.iter().take(ORGS_SHOWN) {
                            li {
                                @if let Some(avatar) = sanitize::safe_url(org.avatar_url.as_deref()) {
                                    img src=(esc(Some(avatar))) alt="" loading="lazy";
                                }
                                " " (esc(Some(&org.login)))
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn error(err: &DisplayError) -> Markup {
    html! {
        div class="erreur" { (esc(Some(&err.to_string()))) }
    }
}

/// A followers/following panel.
pub fn people(kind: ListKind, list: &[PersonSummary]) -> Markup {
    html! {
        section class="people" {
            h3 { (kind.title()) }
            @if list.is_empty() {
                p class="empty" { "Nobody to show" }
            } @else {
                ul {
                    @for person in list {
                        li {
                            @if let Some(avatar) = sanitize::safe_url(person.avatar_url.as_deref()) {
                                img src=(esc(Some(avatar))) alt="" loading="lazy";
                            }
                            " " (esc(Some(&person.login)))
                        }
                    }
                }
            }
        }
    }
}

pub fn history(entries: &[String]) -> Markup {
    html! {
        section class="history" {
            h3 { "Recent searches" }
            ul {
                @for entry in entries {
                    li { (esc(Some(entry))) }
                }
            }
        }
    }
}
