use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// Decode a count the way a browser's `parseInt(x) || 0` would: numbers are
/// truncated, strings contribute their leading digits, everything else is 0.
/// Values beyond `u64` saturate.
fn count<'de, D: Deserializer<'de>>(de: D) -> Result<u64, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(value.as_ref().map_or(0, coerce_count))
}

pub(crate) fn coerce_count(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => {
            let s = s.trim_start();
            let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                0
            } else {
                // Only digits remain, so a parse failure means overflow.
                digits.parse().unwrap_or(u64::MAX)
            }
        }
        _ => 0,
    }
}

/// Missing, `null`, empty and non-string values all decode to `None`.
fn text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn required_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(text(de)?.unwrap_or_default())
}

/// Unparseable timestamps decode to `None` instead of failing the record.
fn timestamp<'de, D: Deserializer<'de>>(de: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(text(de)?.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// `GET /users/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, deserialize_with = "required_text")]
    pub login: String,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub followers: u64,
    #[serde(default, deserialize_with = "count")]
    pub following: u64,
    #[serde(default, deserialize_with = "count")]
    pub public_repos: u64,
    #[serde(default, deserialize_with = "count")]
    pub public_gists: u64,
    #[serde(default, deserialize_with = "text")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub blog: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub twitter_username: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "text")]
    pub html_url: Option<String>,
}

impl ProfileRecord {
    /// Display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// One entry of `GET /users/{id}/repos`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    #[serde(default, deserialize_with = "required_text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub stargazers_count: u64,
    #[serde(default, deserialize_with = "count")]
    pub forks_count: u64,
    #[serde(default, deserialize_with = "text")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub html_url: Option<String>,
}

/// One entry of `GET /users/{id}/orgs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    #[serde(default, deserialize_with = "required_text")]
    pub login: String,
    #[serde(default, deserialize_with = "text")]
    pub avatar_url: Option<String>,
}

/// One entry of `GET /users/{id}/followers` or `/following`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    #[serde(default, deserialize_with = "required_text")]
    pub login: String,
    #[serde(default, deserialize_with = "text")]
    pub avatar_url: Option<String>,
}
