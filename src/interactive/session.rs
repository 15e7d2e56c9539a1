use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::error::TranslateError;
use crate::translation::{AUTO, Pipeline, validate_source, validate_target};
use crate::ui::{Spinner, display_history, display_translation};

/// Source and target languages of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    source: String,
    target: String,
    /// Language detected by the most recent auto-source translation.
    last_detected: Option<String>,
}

impl SessionState {
    pub fn new(source: &str, target: &str) -> Result<Self, TranslateError> {
        Ok(Self {
            source: validate_source(source)?.to_string(),
            target: validate_target(target)?.to_string(),
            last_detected: None,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_source(&mut self, code: &str) -> Result<(), TranslateError> {
        self.source = validate_source(code)?.to_string();
        self.last_detected = None;
        Ok(())
    }

    pub fn set_target(&mut self, code: &str) -> Result<(), TranslateError> {
        self.target = validate_target(code)?.to_string();
        Ok(())
    }

    /// Swaps source and target. With an `auto` source the most recently
    /// detected language takes its place.
    pub fn swap(&mut self) -> Result<(), TranslateError> {
        let source = if self.source == AUTO {
            self.last_detected.clone().ok_or_else(|| {
                TranslateError::validation(
                    "Cannot swap while the source language is 'auto'; translate something first or use /from",
                )
            })?
        } else {
            self.source.clone()
        };
        self.source = std::mem::replace(&mut self.target, source);
        self.last_detected = None;
        Ok(())
    }

    pub fn remember_detected(&mut self, code: &str) {
        if self.source == AUTO {
            self.last_detected = Some(code.to_string());
        }
    }
}

/// Display options for a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub details: bool,
}

/// A REPL-style interactive translation session.
pub struct InteractiveSession {
    pipeline: Pipeline,
    state: SessionState,
    options: SessionOptions,
}

impl InteractiveSession {
    pub const fn new(pipeline: Pipeline, state: SessionState, options: SessionOptions) -> Self {
        Self {
            pipeline,
            state,
            options,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&self.state, self.pipeline.provider().display_name());

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let prompt = format!("[{} -> {}]", self.state.source(), self.state.target());
            let input = Text::new(&prompt)
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    Input::Text(text) => self.translate_and_print(&text).await,
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!();
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    /// Returns `false` when the session should end.
    fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Swap => match self.state.swap() {
                Ok(()) => ui::print_notice(&format!(
                    "Now translating {} -> {}",
                    self.state.source(),
                    self.state.target()
                )),
                Err(e) => ui::print_error(&e.to_string(), None),
            },
            SlashCommand::From(None) => ui::print_error("Usage: /from <language>", None),
            SlashCommand::From(Some(code)) => match self.state.set_source(&code) {
                Ok(()) => ui::print_notice(&format!("Source language set to {}", self.state.source())),
                Err(e) => ui::print_error(&e.to_string(), e.hint().as_deref()),
            },
            SlashCommand::To(None) => ui::print_error("Usage: /to <language>", None),
            SlashCommand::To(Some(code)) => match self.state.set_target(&code) {
                Ok(()) => ui::print_notice(&format!("Target language set to {}", self.state.target())),
                Err(e) => ui::print_error(&e.to_string(), e.hint().as_deref()),
            },
            SlashCommand::History(limit) => match self.pipeline.history() {
                Some(history) => {
                    display_history(&history.list(limit, None));
                    println!();
                }
                None => ui::print_error("History is disabled", None),
            },
            SlashCommand::Config => ui::print_config(
                &self.state,
                self.pipeline.provider().display_name(),
                self.pipeline.history().is_some(),
            ),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::Quit => return false,
            SlashCommand::Usage(usage) => ui::print_error(&format!("Usage: {usage}"), None),
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"), Some("Type /help for commands."));
            }
        }
        true
    }

    /// Translates one line. Failures are reported and the session continues.
    async fn translate_and_print(&mut self, text: &str) {
        let spinner = Spinner::new("Translating...");
        let outcome = self
            .pipeline
            .translate(text, self.state.source(), self.state.target())
            .await;
        spinner.stop();

        match outcome {
            Ok(result) => {
                self.state.remember_detected(&result.resolved_source);
                display_translation(&result, self.options.details);
                println!();
            }
            Err(e) => ui::print_error(&e.to_string(), e.hint().as_deref()),
        }
    }
}
