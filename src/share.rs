use std::io::{self, IsTerminal, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::api::types::ProfileRecord;

/// Result of a share attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The text was handed to the terminal clipboard.
    Copied,
    /// Copying was not possible; show this text so it can be copied by hand.
    Manual(String),
}

/// One-line share text for a profile.
pub fn share_text(profile: &ProfileRecord) -> String {
    let url = profile
        .html_url
        .clone()
        .unwrap_or_else(|| format!("https://github.com/{}", profile.login));
    format!("{} (@{}) on GitHub: {url}", profile.display_name(), profile.login)
}

/// Write `text` to the clipboard through an OSC 52 sequence on `out`.
pub fn copy_with(out: &mut impl Write, text: &str) -> ShareOutcome {
    let sequence = format!("\x1b]52;c;{}\x07", STANDARD.encode(text));
    match out.write_all(sequence.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => ShareOutcome::Copied,
        Err(e) => {
            tracing::warn!("clipboard write failed: {e}");
            ShareOutcome::Manual(text.to_string())
        }
    }
}

/// Copy through the controlling terminal, falling back to manual copy when
/// stdout is not a terminal.
pub fn copy_to_clipboard(text: &str) -> ShareOutcome {
    let mut stdout = io::stdout();
    if !stdout.is_terminal() {
        return ShareOutcome::Manual(text.to_string());
    }
    copy_with(&mut stdout, text)
}
