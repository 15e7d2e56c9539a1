use anyhow::Result;
use std::io::{self, IsTerminal};

use super::{build_pipeline, load_resolved};
use crate::config::ResolveOptions;
use crate::error::TranslateError;
use crate::input::InputReader;
use crate::ui::{Spinner, display_translation};

pub struct TranslateOptions {
    /// Words given on the command line; stdin is read when empty.
    pub text: Vec<String>,
    pub resolve: ResolveOptions,
    pub details: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let text = read_text(&options.text)?;
    let resolved = load_resolved(&options.resolve)?;
    let pipeline = build_pipeline(&resolved)?;

    let spinner = Spinner::new(&format!(
        "Translating with {}...",
        resolved.provider.display_name()
    ));
    let result = pipeline
        .translate(&text, &resolved.source, &resolved.target)
        .await;
    spinner.stop();

    display_translation(&result?, options.details);
    Ok(())
}

fn read_text(words: &[String]) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    if io::stdin().is_terminal() {
        return Err(TranslateError::validation(
            "No text to translate.\n\n\
             Pass the text as an argument, pipe it through stdin, \
             use --file for documents or --interactive for a session.",
        )
        .into());
    }
    InputReader::read_stdin()
}
