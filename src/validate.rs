use std::fmt;

use serde::Serialize;

use crate::lookup::DisplayError;

/// GitHub's maximum login length.
pub const MAX_IDENTIFIER_LEN: usize = 39;

/// True iff `s` is 1..=39 ASCII letters, digits or hyphens.
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_IDENTIFIER_LEN
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// A user handle that has passed [`is_valid_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(s: &str) -> Result<Self, DisplayError> {
        if is_valid_identifier(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(DisplayError::Validation)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize raw user input: trim and drop a leading `@`.
pub fn normalize_input(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed)
}
