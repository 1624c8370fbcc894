#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    User(String),
    /// `None` clears the language facet.
    Language(Option<String>),
    Followers,
    Following,
    History,
    ClearHistory,
    Share,
    Open,
    Help,
    Quit,
}

pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.strip_prefix(':').unwrap_or(input).trim();

    if input.is_empty() {
        return None;
    }

    let (cmd, args) = match input.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (input, ""),
    };

    match cmd {
        "user" | "u" if !args.is_empty() => Some(Command::User(strip_at(args).to_owned())),
        "lang" | "language" if !args.is_empty() => Some(Command::Language(
            (!args.eq_ignore_ascii_case("all")).then(|| args.to_owned()),
        )),
        "followers" => Some(Command::Followers),
        "following" => Some(Command::Following),
        "history" => Some(Command::History),
        "clear-history" => Some(Command::ClearHistory),
        "share" => Some(Command::Share),
        "open" => Some(Command::Open),
        "help" | "h" => Some(Command::Help),
        "quit" | "q" => Some(Command::Quit),
        _ => None,
    }
}

pub fn strip_at(username: &str) -> &str {
    username.strip_prefix('@').unwrap_or(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_user() {
        assert_eq!(
            parse_command(":user @octocat"),
            Some(Command::User("octocat".into()))
        );
        assert_eq!(parse_command("u torvalds"), Some(Command::User("torvalds".into())));
        assert_eq!(parse_command(":user"), None);
    }

    #[test]
    fn test_parse_command_language() {
        assert_eq!(
            parse_command(":lang Rust"),
            Some(Command::Language(Some("Rust".into())))
        );
        assert_eq!(parse_command(":lang all"), Some(Command::Language(None)));
        assert_eq!(
            parse_command(":language Jupyter Notebook"),
            Some(Command::Language(Some("Jupyter Notebook".into())))
        );
    }

    #[test]
    fn test_parse_command_panels_and_history() {
        assert_eq!(parse_command(":followers"), Some(Command::Followers));
        assert_eq!(parse_command(":following"), Some(Command::Following));
        assert_eq!(parse_command(":history"), Some(Command::History));
        assert_eq!(parse_command(":clear-history"), Some(Command::ClearHistory));
    }

    #[test]
    fn test_parse_command_aliases() {
        assert_eq!(parse_command(":q"), Some(Command::Quit));
        assert_eq!(parse_command(":h"), Some(Command::Help));
        assert_eq!(parse_command(":share"), Some(Command::Share));
        assert_eq!(parse_command(":open"), Some(Command::Open));
    }

    #[test]
    fn test_parse_command_empty() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command(":"), None);
        assert_eq!(parse_command(":bogus"), None);
    }

    #[test]
    fn test_strip_at() {
        assert_eq!(strip_at("@alice"), "alice");
        assert_eq!(strip_at("bob"), "bob");
    }
}
