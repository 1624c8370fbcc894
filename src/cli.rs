use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};
use serde::Serialize;

use crate::api::{Fetcher, GitHubClient};
use crate::config::load_config;
use crate::connections::{self, ListKind};
use crate::history::{FileStorage, HistoryStore, Storage};
use crate::lookup;
use crate::render;
use crate::validate::{Identifier, normalize_input};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "ghcard", about = "Look up GitHub profiles from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Look up a user profile (JSONL)
    User {
        /// Username (with or without @)
        username: String,
        /// Only keep repositories written in this language
        #[arg(long, short)]
        language: Option<String>,
    },
    /// Render a profile card as an HTML page
    Card {
        /// Username (with or without @)
        username: String,
        /// Only keep repositories written in this language
        #[arg(long, short)]
        language: Option<String>,
        /// Write the page to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// First page of a user's followers (JSONL)
    Followers {
        username: String,
        /// Print an HTML fragment instead of JSONL
        #[arg(long)]
        html: bool,
    },
    /// First page of the accounts a user follows (JSONL)
    Following {
        username: String,
        /// Print an HTML fragment instead of JSONL
        #[arg(long)]
        html: bool,
    },
    /// Recent lookups, most recent first (JSONL)
    History {
        /// Forget all recent lookups
        #[arg(long)]
        clear: bool,
        /// Print an HTML fragment instead of JSONL
        #[arg(long)]
        html: bool,
    },
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Print each item as one JSON line.
fn print_jsonl<T: Serialize>(out: &mut impl Write, items: &[T]) -> eyre::Result<()> {
    for item in items {
        let line = serde_json::to_string(item)?;
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn parse_identifier(username: &str) -> eyre::Result<Identifier> {
    Identifier::parse(normalize_input(username)).map_err(|e| eyre!("{e}"))
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

/// Run a non-interactive subcommand against the configured API.
pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    let config = load_config();
    let client = GitHubClient::new(&config.api_base_url, config.request_timeout())?;
    let mut history = HistoryStore::new(FileStorage::default_location());
    execute(cmd, &client, &mut history, &mut std::io::stdout()).await
}

async fn execute<S: Storage>(
    cmd: CliCommand,
    api: &impl Fetcher,
    history: &mut HistoryStore<S>,
    out: &mut impl Write,
) -> eyre::Result<()> {
    match cmd {
        CliCommand::Tui => {
            return Err(eyre!("the TUI is launched without a subcommand"));
        }

        CliCommand::User { username, language } => {
            let vm = lookup::lookup(api, history, &username, language.as_deref())
                .await
                .map_err(|e| eyre!("{e}"))?;
            print_jsonl(out, &[vm])?;
        }

        CliCommand::Card {
            username,
            language,
            output,
        } => {
            let result = lookup::lookup(api, history, &username, language.as_deref()).await;
            let (title, body) = match &result {
                Ok(vm) => (
                    format!("{} on GitHub", vm.profile.display_name()),
                    render::card(vm),
                ),
                Err(e) => ("ghcard".to_string(), render::error(e)),
            };
            let html = render::page(&title, body).into_string();

            match output {
                Some(path) => {
                    std::fs::write(&path, &html)?;
                    tracing::info!(path = %path.display(), "wrote profile card");
                }
                None => writeln!(out, "{html}")?,
            }
            result.map_err(|e| eyre!("{e}"))?;
        }

        CliCommand::Followers { username, html } => {
            print_people(api, &username, ListKind::Followers, html, out).await?;
        }

        CliCommand::Following { username, html } => {
            print_people(api, &username, ListKind::Following, html, out).await?;
        }

        CliCommand::History { clear, html } => {
            if clear {
                history.clear();
            } else if html {
                writeln!(out, "{}", render::history(history.list()).into_string())?;
            } else {
                print_jsonl(out, history.list())?;
            }
        }
    }

    Ok(())
}

async fn print_people(
    api: &impl Fetcher,
    username: &str,
    kind: ListKind,
    html: bool,
    out: &mut impl Write,
) -> eyre::Result<()> {
    let id = parse_identifier(username)?;
    let people = connections::fetch(api, &id, kind).await;
    if html {
        writeln!(out, "{}", render::people(kind, people.items()).into_string())?;
    } else {
        print_jsonl(out, people.items())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestOutcome;
    use crate::api::stub::ScriptedFetcher;
    use crate::history::MemoryStorage;
    use serde_json::json;

    fn octocat() -> ScriptedFetcher {
        ScriptedFetcher::new()
            .answer(
                "/users/octocat",
                RequestOutcome::Success(json!({"login": "octocat", "followers": "4000"})),
            )
            .answer(
                "/users/octocat/repos?sort=stars&per_page=100",
                RequestOutcome::Success(json!([
                    {"name": "hello", "language": "Rust", "stargazers_count": 5},
                    {"name": "world", "language": "Go", "stargazers_count": 1}
                ])),
            )
            .answer("/users/octocat/orgs", RequestOutcome::Success(json!([])))
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parse_user_with_language() {
        let cli = Cli::try_parse_from(["ghcard", "user", "@octocat", "--language", "Rust"]).unwrap();
        assert_eq!(
            cli.command,
            Some(CliCommand::User {
                username: "@octocat".into(),
                language: Some("Rust".into()),
            })
        );
    }

    #[test]
    fn parse_defaults_to_tui() {
        let cli = Cli::try_parse_from(["ghcard"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn parse_history_clear() {
        let cli = Cli::try_parse_from(["ghcard", "history", "--clear"]).unwrap();
        assert_eq!(
            cli.command,
            Some(CliCommand::History {
                clear: true,
                html: false
            })
        );
    }

    #[tokio::test]
    async fn user_prints_one_json_line_and_records_history() {
        let api = octocat();
        let mut history = HistoryStore::new(MemoryStorage::default());
        let mut out = Vec::new();

        let cmd = CliCommand::User {
            username: "@octocat".into(),
            language: Some("rust".into()),
        };
        execute(cmd, &api, &mut history, &mut out).await.unwrap();

        let text = output(out);
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["profile"]["followers"], 4000);
        assert_eq!(value["repos"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(value["languages"], json!(["Go", "Rust"]));
        assert_eq!(history.list(), vec!["octocat".to_string()]);
    }

    #[tokio::test]
    async fn card_prints_escaped_page() {
        let api = ScriptedFetcher::new()
            .answer(
                "/users/octocat",
                RequestOutcome::Success(json!({
                    "login": "octocat",
                    "bio": "<script>alert(1)</script>"
                })),
            )
            .answer(
                "/users/octocat/repos?sort=stars&per_page=100",
                RequestOutcome::Success(json!([])),
            )
            .answer("/users/octocat/orgs", RequestOutcome::Success(json!([])));
        let mut history = HistoryStore::new(MemoryStorage::default());
        let mut out = Vec::new();

        let cmd = CliCommand::Card {
            username: "octocat".into(),
            language: None,
            output: None,
        };
        execute(cmd, &api, &mut history, &mut out).await.unwrap();

        let html = output(out);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn card_failure_renders_error_and_fails() {
        let api = ScriptedFetcher::new().answer("/users/ghost", RequestOutcome::NotFound);
        let mut history = HistoryStore::new(MemoryStorage::default());
        let mut out = Vec::new();

        let cmd = CliCommand::Card {
            username: "ghost".into(),
            language: None,
            output: None,
        };
        let err = execute(cmd, &api, &mut history, &mut out).await.unwrap_err();

        assert_eq!(err.to_string(), "User not found. Check the username.");
        assert!(output(out).contains("class=\"erreur\""));
    }

    #[tokio::test]
    async fn card_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("octocat.html");
        let api = octocat();
        let mut history = HistoryStore::new(MemoryStorage::default());
        let mut out = Vec::new();

        let cmd = CliCommand::Card {
            username: "octocat".into(),
            language: None,
            output: Some(path.clone()),
        };
        execute(cmd, &api, &mut history, &mut out).await.unwrap();

        assert!(out.is_empty());
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("4000"));
    }

    #[tokio::test]
    async fn invalid_username_is_rejected_without_requests() {
        let api = ScriptedFetcher::new();
        let mut history = HistoryStore::new(MemoryStorage::default());
        let mut out = Vec::new();

        let cmd = CliCommand::Followers {
            username: "not a user".into(),
            html: false,
        };
        assert!(execute(cmd, &api, &mut history, &mut out).await.is_err());
        assert!(api.requested().is_empty());
    }

    #[tokio::test]
    async fn followers_print_jsonl() {
        let api = ScriptedFetcher::new().answer(
            "/users/octocat/followers?per_page=12",
            RequestOutcome::Success(json!([{"login": "alice"}, {"login": "bob"}])),
        );
        let mut history = HistoryStore::new(MemoryStorage::default());
        let mut out = Vec::new();

        let cmd = CliCommand::Followers {
            username: "octocat".into(),
            html: false,
        };
        execute(cmd, &api, &mut history, &mut out).await.unwrap();

        let text = output(out);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("\"alice\""));
        assert!(history.list().is_empty());
    }

    #[tokio::test]
    async fn history_lists_and_clears() {
        let api = ScriptedFetcher::new();
        let mut history = HistoryStore::new(MemoryStorage::default());
        history.record("alice");
        history.record("bob");

        let mut out = Vec::new();
        let cmd = CliCommand::History {
            clear: false,
            html: false,
        };
        execute(cmd, &api, &mut history, &mut out).await.unwrap();
        assert_eq!(output(out), "\"bob\"\n\"alice\"\n");

        let mut out = Vec::new();
        let cmd = CliCommand::History {
            clear: true,
            html: false,
        };
        execute(cmd, &api, &mut history, &mut out).await.unwrap();
        assert!(history.list().is_empty());
    }
}
