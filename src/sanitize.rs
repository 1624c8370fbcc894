/// Shown in place of any optional field the API left empty.
pub const PLACEHOLDER: &str = "Not provided";

/// Escape text for embedding into HTML element content or a quoted attribute.
///
/// Absent or empty input yields [`PLACEHOLDER`]. The five markup-significant
/// characters are replaced with entities, so the result always renders as
/// literal text.
pub fn escape(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return PLACEHOLDER.to_string();
    };

    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Return the URL only if it uses an http(s) scheme and may be placed in an
/// `href`/`src` attribute.
pub fn safe_url(url: Option<&str>) -> Option<&str> {
    let url = url?.trim();
    let parsed = url::Url::parse(url).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(url)
}

/// Prepare remote text for terminal output.
///
/// Same placeholder rule as [`escape`]; control characters are dropped so a
/// remote string cannot smuggle escape sequences into the terminal. Newlines
/// and tabs collapse to spaces.
pub fn terminal_text(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return PLACEHOLDER.to_string();
    };

    text.chars()
        .filter_map(|c| match c {
            '\n' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_absent_or_empty_is_placeholder() {
        assert_eq!(escape(None), PLACEHOLDER);
        assert_eq!(escape(Some("")), PLACEHOLDER);
    }

    #[test]
    fn escape_plain_text_untouched() {
        assert_eq!(escape(Some("The Octocat")), "The Octocat");
    }

    #[test]
    fn escape_neutralizes_script_tags() {
        let out = escape(Some("<script>alert('x')</script>"));
        assert_eq!(out, "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;");
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
    }

    #[test]
    fn escape_neutralizes_attribute_breakout() {
        let out = escape(Some(r#""><img src=x onerror="alert(1)">"#));
        assert!(!out.contains('"'));
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(out.contains("onerror="), "text survives as literal text");
    }

    #[test]
    fn escape_ampersand_first() {
        assert_eq!(escape(Some("&lt;")), "&amp;lt;");
    }

    #[test]
    fn safe_url_accepts_http_schemes() {
        assert_eq!(
            safe_url(Some("https://github.com/octocat")),
            Some("https://github.com/octocat")
        );
        assert_eq!(safe_url(Some("http://example.com")), Some("http://example.com"));
    }

    #[test]
    fn safe_url_rejects_script_and_garbage() {
        assert_eq!(safe_url(Some("javascript:alert(1)")), None);
        assert_eq!(safe_url(Some("data:text/html,<b>x</b>")), None);
        assert_eq!(safe_url(Some("not a url")), None);
        assert_eq!(safe_url(None), None);
    }

    #[test]
    fn terminal_text_strips_escape_sequences() {
        let out = terminal_text(Some("hi\u{1b}[2Jthere\u{7}\nnext"));
        assert_eq!(out, "hi[2Jthere next");
    }

    #[test]
    fn terminal_text_blank_is_placeholder() {
        assert_eq!(terminal_text(Some("   ")), PLACEHOLDER);
        assert_eq!(terminal_text(None), PLACEHOLDER);
    }
}
