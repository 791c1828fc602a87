//! Line-oriented command parsing for the terminal front end.

pub const HELP_TEXT: &str = "\
Commands:
  /groups            list knowledge-base groups
  /group <id>        switch to a group
  /urls              list the active group's reference URLs
  /add <url>         add a reference URL to the active group
  /remove <url>      remove a reference URL from the active group
  /suggest <n>       send suggested question number n
  /help              show this help
  /quit              exit
Anything else is sent as a query against the active group.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectGroup(String),
    ListGroups,
    AddUrl(String),
    RemoveUrl(String),
    ListUrls,
    Suggest(usize),
    Query(String),
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if !trimmed.starts_with('/') {
        return Command::Query(trimmed.to_string());
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "/group" if !rest.is_empty() => Command::SelectGroup(rest.to_string()),
        "/groups" => Command::ListGroups,
        "/add" if !rest.is_empty() => Command::AddUrl(rest.to_string()),
        "/remove" if !rest.is_empty() => Command::RemoveUrl(rest.to_string()),
        "/urls" => Command::ListUrls,
        "/suggest" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Suggest(n),
            _ => Command::Help,
        },
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Help,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(
            parse_line("  what is ownership? "),
            Command::Query("what is ownership?".to_string())
        );
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(parse_line("   "), Command::Empty);
    }

    #[test]
    fn group_commands_parse() {
        assert_eq!(parse_line("/groups"), Command::ListGroups);
        assert_eq!(
            parse_line("/group docs"),
            Command::SelectGroup("docs".to_string())
        );
        // Missing argument degrades to help rather than an empty id.
        assert_eq!(parse_line("/group"), Command::Help);
    }

    #[test]
    fn url_commands_parse() {
        assert_eq!(parse_line("/urls"), Command::ListUrls);
        assert_eq!(
            parse_line("/add https://a.example.com"),
            Command::AddUrl("https://a.example.com".to_string())
        );
        assert_eq!(
            parse_line("/remove https://a.example.com"),
            Command::RemoveUrl("https://a.example.com".to_string())
        );
    }

    #[test]
    fn suggest_requires_a_one_based_index() {
        assert_eq!(parse_line("/suggest 2"), Command::Suggest(2));
        assert_eq!(parse_line("/suggest 0"), Command::Help);
        assert_eq!(parse_line("/suggest"), Command::Help);
        assert_eq!(parse_line("/suggest two"), Command::Help);
    }

    #[test]
    fn unknown_slash_command_shows_help() {
        assert_eq!(parse_line("/frobnicate"), Command::Help);
    }

    #[test]
    fn quit_aliases() {
        assert_eq!(parse_line("/quit"), Command::Quit);
        assert_eq!(parse_line("/exit"), Command::Quit);
    }
}
