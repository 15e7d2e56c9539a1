//! Interactive mode UI components.

use crate::translation::language_name;
use crate::ui::Style;

use super::command::SLASH_COMMANDS;
use super::session::SessionState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(state: &SessionState, provider: &str) {
    println!(
        "{} {} - Interactive Translation Mode",
        Style::header("xlate"),
        Style::secondary(format!("v{VERSION}"))
    );
    println!(
        "Translating {} -> {} with {}",
        Style::code(state.source()),
        Style::code(state.target()),
        Style::value(provider)
    );
    println!(
        "{}",
        Style::hint("Type text to translate, /help for commands, /quit or Ctrl+C to exit")
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(state: &SessionState, provider: &str, history: bool) {
    println!("{}", Style::header("Session"));
    println!(
        "  {}  {}",
        Style::label("provider"),
        Style::value(provider)
    );
    println!(
        "  {}    {} {}",
        Style::label("source"),
        Style::code(state.source()),
        Style::secondary(format!("({})", language_name(state.source())))
    );
    println!(
        "  {}    {} {}",
        Style::label("target"),
        Style::code(state.target()),
        Style::secondary(format!("({})", language_name(state.target())))
    );
    println!(
        "  {}   {}",
        Style::label("history"),
        Style::value(if history { "on" } else { "off" })
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    let width = SLASH_COMMANDS
        .iter()
        .map(|(cmd, _)| cmd.len())
        .max()
        .unwrap_or(0);
    for (cmd, description) in SLASH_COMMANDS {
        println!(
            "  {}  {}",
            Style::command(format!("{cmd:<width$}")),
            Style::secondary(description)
        );
    }
    println!();
}

pub fn print_notice(message: &str) {
    println!("{} {message}", Style::success("✓"));
}

pub fn print_error(message: &str, hint: Option<&str>) {
    eprintln!("{} {message}", Style::error("Error:"));
    if let Some(hint) = hint {
        eprintln!("{}", Style::hint(hint));
    }
    eprintln!();
}
