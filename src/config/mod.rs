//! Configuration file management and per-invocation resolution.

mod manager;

pub use manager::{
    AZURE_REGION_ENV, Config, ConfigManager, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_HISTORY,
    DEFAULT_MAX_TEXT_LENGTH, DEFAULT_TIMEOUT_SECS, GENERIC_API_KEY_ENV, ResolveOptions,
    ResolvedConfig, resolve_config,
};
