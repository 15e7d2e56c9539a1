use anyhow::Result;

use super::{build_pipeline, load_resolved};
use crate::config::ResolveOptions;
use crate::interactive::{InteractiveSession, SessionOptions, SessionState};

pub async fn run_interactive(resolve: ResolveOptions, details: bool) -> Result<()> {
    let resolved = load_resolved(&resolve)?;
    let state = SessionState::new(&resolved.source, &resolved.target)?;
    let pipeline = build_pipeline(&resolved)?;

    InteractiveSession::new(pipeline, state, SessionOptions { details })
        .run()
        .await
}
