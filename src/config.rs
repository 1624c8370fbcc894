use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;

/// Environment override for the API base URL.
pub const API_URL_ENV: &str = "GHCARD_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_live_search_min_chars")]
    pub live_search_min_chars: usize,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_live_search_min_chars() -> usize {
    3
}

fn default_tick_rate() -> f64 {
    30.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            debounce_ms: default_debounce_ms(),
            live_search_min_chars: default_live_search_min_chars(),
            tick_rate_fps: default_tick_rate(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/ghcard"))
}

/// Load `.env` files; variables already set in the environment win.
pub fn load_env_files() {
    let mut paths = Vec::new();
    if let Some(dir) = config_dir() {
        paths.push(dir.join(".env"));
    }
    paths.push(PathBuf::from(".env"));

    for path in paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!("ignoring invalid config: {e}");
        AppConfig::default()
    })
}

fn apply_env(mut config: AppConfig, api_url: Option<String>) -> AppConfig {
    if let Some(url) = api_url.filter(|v| !v.is_empty()) {
        config.api_base_url = url;
    }
    config
}

pub fn load_config() -> AppConfig {
    load_env_files();

    let config = config_dir()
        .map(|dir| dir.join("config.toml"))
        .and_then(|path| fs::read_to_string(path).ok())
        .map_or_else(AppConfig::default, |contents| parse_config(&contents));

    apply_env(config, std::env::var(API_URL_ENV).ok())
}
