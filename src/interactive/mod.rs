//! Interactive translation mode.
//!
//! A REPL with slash commands for switching languages and browsing history.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod ui;

pub use session::{InteractiveSession, SessionOptions, SessionState};
