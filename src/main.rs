pub mod api;
pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod connections;
pub mod debounce;
pub mod event;
pub mod history;
pub mod lookup;
pub mod render;
pub mod sanitize;
pub mod share;
pub mod ui;
pub mod validate;

use api::GitHubClient;
use app::App;
use clap::Parser;
use cli::{Cli, CliCommand};
use config::load_config;
use history::{FileStorage, HistoryStore};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize tracing (logs to stderr if RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None | Some(CliCommand::Tui) => run_tui().await,
        // All other subcommands → non-interactive output.
        Some(cmd) => cli::run_command(cmd).await,
    }
}

/// Launch the interactive TUI.
async fn run_tui() -> color_eyre::Result<()> {
    let config = load_config();
    let client = GitHubClient::new(&config.api_base_url, config.request_timeout())?;
    tracing::info!(base_url = %config.api_base_url, "api client initialized");
    let history = HistoryStore::new(FileStorage::default_location());

    let terminal = ratatui::init();
    let result = App::new(config, client, history).run(terminal).await;
    ratatui::restore();
    result
}
