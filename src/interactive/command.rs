use inquire::autocompletion::{Autocomplete, Replacement};

/// Entries shown by `/history` when no count is given.
pub const DEFAULT_HISTORY_ENTRIES: usize = 10;

// Available slash commands: (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/swap", "Swap source and target languages"),
    ("/from", "Set the source language (e.g. /from fr, /from auto)"),
    ("/to", "Set the target language (e.g. /to ja)"),
    ("/history", "Show recent translations (e.g. /history 5)"),
    ("/config", "Show current session settings"),
    ("/help", "Show available commands"),
    ("/quit", "Exit interactive mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') || input.contains(' ') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Swap,
    From(Option<String>),
    To(Option<String>),
    History(usize),
    Config,
    Help,
    Quit,
    /// A known command with unusable arguments; carries the usage line.
    Usage(&'static str),
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let arg = parts.get(1).map(|s| (*s).to_string());

    let command = match parts.first().copied() {
        Some("swap" | "s") => SlashCommand::Swap,
        Some("from") => SlashCommand::From(arg),
        Some("to") => SlashCommand::To(arg),
        Some("history" | "h") => match parts.get(1) {
            None => SlashCommand::History(DEFAULT_HISTORY_ENTRIES),
            Some(n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => SlashCommand::History(n),
                _ => SlashCommand::Usage("/history [number of entries]"),
            },
        },
        Some("config") => SlashCommand::Config,
        Some("help" | "?") => SlashCommand::Help,
        Some("quit" | "exit" | "q") => SlashCommand::Quit,
        _ => SlashCommand::Unknown(parts.join(" ")),
    };
    Input::Command(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_input(""), Input::Empty);
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[test]
    fn test_parse_text_input() {
        assert_eq!(
            parse_input("  Hello, world!  "),
            Input::Text("Hello, world!".to_string())
        );
    }

    #[test]
    fn test_parse_swap_command() {
        assert_eq!(parse_input("/swap"), Input::Command(SlashCommand::Swap));
        assert_eq!(parse_input("/s"), Input::Command(SlashCommand::Swap));
    }

    #[test]
    fn test_parse_language_commands() {
        assert_eq!(
            parse_input("/from fr"),
            Input::Command(SlashCommand::From(Some("fr".to_string())))
        );
        assert_eq!(
            parse_input("/to"),
            Input::Command(SlashCommand::To(None))
        );
    }

    #[test]
    fn test_parse_history_command() {
        assert_eq!(
            parse_input("/history"),
            Input::Command(SlashCommand::History(DEFAULT_HISTORY_ENTRIES))
        );
        assert_eq!(
            parse_input("/history 3"),
            Input::Command(SlashCommand::History(3))
        );
        assert!(matches!(
            parse_input("/history lots"),
            Input::Command(SlashCommand::Usage(_))
        ));
        assert!(matches!(
            parse_input("/history 0"),
            Input::Command(SlashCommand::Usage(_))
        ));
    }

    #[test]
    fn test_parse_quit_commands() {
        for input in ["/quit", "/exit", "/q"] {
            assert_eq!(parse_input(input), Input::Command(SlashCommand::Quit));
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse_input("/unknown thing"),
            Input::Command(SlashCommand::Unknown("unknown thing".to_string()))
        );
    }

    #[test]
    fn test_completer_no_suggestions_for_regular_text() {
        let mut completer = SlashCommandCompleter;
        assert!(completer.get_suggestions("hello").unwrap().is_empty());
    }

    #[test]
    fn test_completer_suggestions_for_slash() {
        let mut completer = SlashCommandCompleter;
        let suggestions = completer.get_suggestions("/").unwrap();
        assert_eq!(suggestions.len(), SLASH_COMMANDS.len());
    }

    #[test]
    fn test_completer_suggestions_filter_by_prefix() {
        let mut completer = SlashCommandCompleter;

        let suggestions = completer.get_suggestions("/h").unwrap();
        assert_eq!(suggestions.len(), 2);

        let suggestions = completer.get_suggestions("/sw").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("/swap"));
    }

    #[test]
    fn test_completer_stops_after_argument_starts() {
        let mut completer = SlashCommandCompleter;
        assert!(completer.get_suggestions("/to j").unwrap().is_empty());
    }

    #[test]
    fn test_completer_completion() {
        let mut completer = SlashCommandCompleter;
        let suggestion = "/config  Show current session settings".to_string();
        let completion = completer.get_completion("/c", Some(suggestion)).unwrap();
        assert_eq!(completion, Some("/config".to_string()));
    }
}
