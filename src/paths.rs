//! XDG-style path utilities for configuration, history and cache.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "xlate";

/// Returns the configuration directory for xlate.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/xlate` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/xlate` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

/// Returns the cache directory for xlate.
///
/// Resolution order:
/// 1. `$XDG_CACHE_HOME/xlate` if `XDG_CACHE_HOME` is set
/// 2. `~/.cache/xlate` otherwise
pub fn cache_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CACHE_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".cache").join(APP_DIR)),
    }
}

/// Path of the configuration file.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Path of the history file; it lives next to the configuration.
pub fn history_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("history.json"))
}

/// Path of the cached live language catalogs.
pub fn language_cache_file() -> Result<PathBuf> {
    Ok(cache_dir()?.join("languages.json"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir_default() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };

        let dir = config_dir().unwrap();
        assert!(dir.ends_with(".config/xlate"));

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", "/custom/config") };

        assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/xlate"));
        assert_eq!(
            history_file().unwrap(),
            PathBuf::from("/custom/config/xlate/history.json")
        );

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        } else {
            unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        }
    }

    #[test]
    #[serial]
    fn test_cache_dir_xdg_override() {
        let original = std::env::var("XDG_CACHE_HOME").ok();
        unsafe { std::env::set_var("XDG_CACHE_HOME", "/custom/cache") };

        assert_eq!(
            language_cache_file().unwrap(),
            PathBuf::from("/custom/cache/xlate/languages.json")
        );

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CACHE_HOME", val) };
        } else {
            unsafe { std::env::remove_var("XDG_CACHE_HOME") };
        }
    }
}
