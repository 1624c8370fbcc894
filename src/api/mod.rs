pub mod types;
pub mod users;

#[cfg(test)]
pub(crate) mod stub;

use std::future::Future;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid API base URL {url:?}: {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
}

// ---------------------------------------------------------------------------
// Request outcome
// ---------------------------------------------------------------------------

/// Every way a single GET can end. Nothing escapes the fetch boundary as an
/// error; callers match on this exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome<T = serde_json::Value> {
    Success(T),
    NotFound,
    RateLimited,
    OtherError(u16),
    TimedOut,
    NetworkError,
}

/// The failure half of [`RequestOutcome`], without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Failure {
    NotFound,
    RateLimited,
    OtherError(u16),
    TimedOut,
    NetworkError,
}

impl<T> RequestOutcome<T> {
    /// Split into the payload or the failure kind.
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Self::Success(v) => Ok(v),
            Self::NotFound => Err(Failure::NotFound),
            Self::RateLimited => Err(Failure::RateLimited),
            Self::OtherError(status) => Err(Failure::OtherError(status)),
            Self::TimedOut => Err(Failure::TimedOut),
            Self::NetworkError => Err(Failure::NetworkError),
        }
    }
}

impl RequestOutcome<serde_json::Value> {
    /// Decode a successful JSON body. A body of the wrong shape is treated
    /// like a broken connection.
    pub fn decode<T: DeserializeOwned>(self) -> RequestOutcome<T> {
        match self.into_result() {
            Ok(value) => match serde_json::from_value(value) {
                Ok(decoded) => RequestOutcome::Success(decoded),
                Err(e) => {
                    tracing::warn!("undecodable response body: {e}");
                    RequestOutcome::NetworkError
                }
            },
            Err(failure) => failure.into(),
        }
    }
}

impl<T> From<Failure> for RequestOutcome<T> {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::NotFound => Self::NotFound,
            Failure::RateLimited => Self::RateLimited,
            Failure::OtherError(status) => Self::OtherError(status),
            Failure::TimedOut => Self::TimedOut,
            Failure::NetworkError => Self::NetworkError,
        }
    }
}

/// Map an HTTP status to an outcome, carrying `body` on success.
pub fn classify_status<T>(status: u16, body: impl FnOnce() -> T) -> RequestOutcome<T> {
    match status {
        200..=299 => RequestOutcome::Success(body()),
        404 => RequestOutcome::NotFound,
        403 => RequestOutcome::RateLimited,
        other => RequestOutcome::OtherError(other),
    }
}

// ---------------------------------------------------------------------------
// Fetcher seam
// ---------------------------------------------------------------------------

/// Issues one GET against an API path (e.g. `/users/octocat`) and reports how
/// it went.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, path: &str) -> impl Future<Output = RequestOutcome> + Send;
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("ghcard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: url::Url,
    timeout: Duration,
}

impl GitHubClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let base_url = url::Url::parse(base_url).map_err(|source| ApiClientError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    /// Build a full API URL from a path with optional query
    /// (e.g. "/users/octocat/repos?sort=stars").
    pub(crate) fn url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    /// Send the request and read the body, without the deadline.
    async fn send(&self, url: &str) -> RequestOutcome {
        let resp = match self.http.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(url, "transport error: {e}");
                return RequestOutcome::NetworkError;
            }
        };

        let status = resp.status().as_u16();
        if let Err(failure) = classify_status(status, || ()).into_result() {
            tracing::debug!(url, status, "non-success status");
            return failure.into();
        }

        match resp.json::<serde_json::Value>().await {
            Ok(body) => RequestOutcome::Success(body),
            Err(e) => {
                tracing::debug!(url, "unreadable body: {e}");
                RequestOutcome::NetworkError
            }
        }
    }
}

impl Fetcher for GitHubClient {
    fn fetch(&self, path: &str) -> impl Future<Output = RequestOutcome> + Send {
        let url = self.url(path);
        async move {
            tracing::debug!(%url, "GET");
            match tokio::time::timeout(self.timeout, self.send(&url)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(%url, timeout = ?self.timeout, "request timed out, aborted");
                    RequestOutcome::TimedOut
                }
            }
        }
    }
}
