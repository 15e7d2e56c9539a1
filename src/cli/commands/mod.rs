//! Subcommand implementations.

use anyhow::Result;
use tracing::debug;

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::history::HistoryStore;
use crate::paths;
use crate::provider::build_adapter;
use crate::translation::Pipeline;

/// Setup wizard and configuration display.
pub mod configure;

/// Chunked file translation.
pub mod file;

/// History listing and clearing.
pub mod history;

/// Interactive translation session.
pub mod interactive;

/// Language catalog listing.
pub mod languages;

/// Provider listing.
pub mod providers;

/// Single text translation.
pub mod translate;

/// Loads the configuration file and applies command-line overrides.
pub fn load_resolved(options: &ResolveOptions) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let resolved = resolve_config(options, &config)?;
    debug!(config = ?resolved, "resolved configuration");
    Ok(resolved)
}

/// Builds a translation pipeline for the resolved provider, with history
/// attached when enabled.
pub fn build_pipeline(resolved: &ResolvedConfig) -> Result<Pipeline> {
    let adapter = build_adapter(resolved.provider, &resolved.settings)?;
    let mut pipeline = Pipeline::new(adapter).with_max_text_length(resolved.max_text_length);
    if resolved.history_enabled {
        pipeline = pipeline.with_history(HistoryStore::new(
            paths::history_file()?,
            resolved.max_history,
        ));
    }
    Ok(pipeline)
}
