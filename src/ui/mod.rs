//! Terminal presentation: styling, spinners and result rendering.

use anyhow::Result;
use inquire::InquireError;

mod display;
mod spinner;
mod style;

pub use display::{
    display_history, display_languages, display_translation, format_timestamp,
    format_timestamp_at, render_history, render_languages, render_translation, truncate,
};
pub use spinner::{ChunkProgress, Spinner};
pub use style::Style;

/// Runs `prompts`, treating Esc or Ctrl+C inside an `inquire` prompt as a
/// clean exit rather than an error.
pub fn handle_prompt_cancellation<F>(prompts: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    prompts().or_else(|err| {
        if is_cancellation(&err) {
            // leave the cursor below the abandoned prompt
            println!();
            Ok(())
        } else {
            Err(err)
        }
    })
}

fn is_cancellation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}
