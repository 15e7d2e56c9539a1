use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::TranslateError;
use crate::fs::atomic_write_private;
use crate::paths;
use crate::provider::{ProviderKind, ProviderSettings};
use crate::translation::language::{self, AUTO};

/// Generic key variable consulted after the provider-specific one.
pub const GENERIC_API_KEY_ENV: &str = "TRANSLATOR_API_KEY";

/// Region variable for Azure resources.
pub const AZURE_REGION_ENV: &str = "AZURE_TRANSLATOR_REGION";

pub const DEFAULT_MAX_HISTORY: usize = 100;
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;
pub const DEFAULT_CHUNK_SIZE: usize = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The configuration file structure.
///
/// Corresponds to `~/.config/xlate/config.json`. Missing fields take their
/// defaults, so a partial file is valid.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Translation provider.
    pub provider: ProviderKind,
    /// Default source language code, or `auto`.
    pub default_source: String,
    /// Default target language code.
    pub default_target: String,
    /// Whether translations are written to history.
    pub history_enabled: bool,
    /// Maximum number of history records kept. Zero disables history.
    pub max_history: usize,
    /// API key stored directly in config (environment variables take precedence).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Base URL override, e.g. a self-hosted LibreTranslate instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Azure resource region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Longest text accepted for a single translation, in characters.
    pub max_text_length: usize,
    /// Chunk size used for file translation, in characters.
    pub chunk_size: usize,
    /// Provider request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Google,
            default_source: AUTO.to_string(),
            default_target: "en".to_string(),
            history_enabled: true,
            max_history: DEFAULT_MAX_HISTORY,
            api_key: None,
            api_key_env: None,
            endpoint: None,
            region: None,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("default_source", &self.default_source)
            .field("default_target", &self.default_target)
            .field("history_enabled", &self.history_enabled)
            .field("max_history", &self.max_history)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("max_text_length", &self.max_text_length)
            .field("chunk_size", &self.chunk_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Checks the invariants a saved configuration must satisfy.
    pub fn validate(&self) -> Result<()> {
        language::validate_source(&self.default_source)
            .context("Invalid 'default_source'")?;
        language::validate_target(&self.default_target)
            .context("Invalid 'default_target'")?;
        if self.max_text_length == 0 {
            bail!("'max_text_length' must be greater than 0");
        }
        if self.chunk_size == 0 {
            bail!("'chunk_size' must be greater than 0");
        }
        if self.chunk_size > self.max_text_length {
            bail!(
                "'chunk_size' ({}) must not exceed 'max_text_length' ({})",
                self.chunk_size,
                self.max_text_length
            );
        }
        if self.timeout_secs == 0 {
            bail!("'timeout_secs' must be greater than 0");
        }
        Ok(())
    }

    /// Whether translations should be recorded.
    pub const fn history_active(&self) -> bool {
        self.history_enabled && self.max_history > 0
    }

    /// Gets the API key for `kind`.
    ///
    /// Resolution order: the configured `api_key_env` variable, the
    /// provider's conventional variable, `TRANSLATOR_API_KEY`, then the key
    /// stored in the file. Stored settings only apply to the configured provider.
    pub fn get_api_key(&self, kind: ProviderKind) -> Option<String> {
        let own = kind == self.provider;
        let custom_env = self.api_key_env.as_deref().filter(|_| own);

        custom_env
            .into_iter()
            .chain([kind.api_key_env(), GENERIC_API_KEY_ENV])
            .find_map(|var| std::env::var(var).ok().filter(|k| !k.is_empty()))
            .or_else(|| self.api_key.clone().filter(|_| own))
    }

    /// Gets the Azure region, preferring the environment.
    pub fn get_region(&self) -> Option<String> {
        std::env::var(AZURE_REGION_ENV)
            .ok()
            .filter(|r| !r.is_empty())
            .or_else(|| self.region.clone())
    }
}

/// Command-line overrides; they take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<ProviderKind>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub no_history: bool,
}

/// Settings for one invocation after merging CLI options and the config file.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub provider: ProviderKind,
    pub source: String,
    pub target: String,
    pub history_enabled: bool,
    pub max_history: usize,
    pub max_text_length: usize,
    pub chunk_size: usize,
    pub settings: ProviderSettings,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("provider", &self.provider)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("history_enabled", &self.history_enabled)
            .field("max_history", &self.max_history)
            .field("max_text_length", &self.max_text_length)
            .field("chunk_size", &self.chunk_size)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// # Errors
///
/// Returns an error if a language code is not supported, or if source and
/// target are the same concrete language.
pub fn resolve_config(options: &ResolveOptions, config: &Config) -> Result<ResolvedConfig> {
    let provider = options.provider.unwrap_or(config.provider);

    let source = options.source.as_deref().unwrap_or(&config.default_source);
    let source = language::validate_source(source)?.to_string();

    let target = options.target.as_deref().unwrap_or(&config.default_target);
    let target = language::validate_target(target)?.to_string();

    if source == target {
        return Err(TranslateError::validation(format!(
            "Source and target language are both '{source}'"
        ))
        .into());
    }

    let own = provider == config.provider;
    let settings = ProviderSettings {
        api_key: config.get_api_key(provider),
        endpoint: config.endpoint.clone().filter(|_| own),
        region: if provider == ProviderKind::Azure {
            config.get_region()
        } else {
            None
        },
        timeout: Some(Duration::from_secs(config.timeout_secs.max(1))),
    };

    Ok(ResolvedConfig {
        provider,
        source,
        target,
        history_enabled: config.history_active() && !options.no_history,
        max_history: config.max_history,
        max_text_length: config.max_text_length,
        chunk_size: config.chunk_size.min(config.max_text_length).max(1),
        settings,
    })
}

/// Manages loading and saving the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/xlate/config.json`
    /// or `~/.config/xlate/config.json` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    /// Creates a manager for an explicit file location.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Loads the configuration. A missing file yields the defaults.
    pub fn load(&self) -> Result<Config> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.config_path.display(), "no config file; using defaults");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read config file: {}", self.config_path.display())
                });
            }
        };

        serde_json::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Validates and writes the configuration, keeping the previous file as
    /// `config.json.bak`.
    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;

        let contents =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        if self.config_path.exists() {
            let backup = self.config_path.with_extension("json.bak");
            let previous = fs::read(&self.config_path).with_context(|| {
                format!("Failed to read config file: {}", self.config_path.display())
            })?;
            atomic_write_private(&backup, &previous).with_context(|| {
                format!("Failed to back up config file to {}", backup.display())
            })?;
        }

        atomic_write_private(&self.config_path, contents.as_bytes()).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.json"))
    }

    #[test]
    fn test_load_nonexistent_config_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_source, "auto");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let config = Config {
            provider: ProviderKind::DeepL,
            default_target: "ja".to_string(),
            max_history: 20,
            api_key_env: Some("MY_DEEPL_KEY".to_string()),
            ..Config::default()
        };

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_keeps_backup() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager.save(&Config::default()).unwrap();
        let updated = Config {
            default_target: "de".to_string(),
            ..Config::default()
        };
        manager.save(&updated).unwrap();

        let backup = temp_dir.path().join("config.json.bak");
        let previous: Config =
            serde_json::from_str(&fs::read_to_string(backup).unwrap()).unwrap();
        assert_eq!(previous.default_target, "en");
        assert_eq!(manager.load().unwrap().default_target, "de");
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_and_backup_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"api_key": "hand-edited"}"#).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        manager.save(&Config::default()).unwrap();

        for file in [path, temp_dir.path().join("config.json.bak")] {
            let mode = fs::metadata(&file).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600, "{}", file.display());
        }
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let config = Config {
            default_target: "auto".to_string(),
            ..Config::default()
        };
        assert!(manager.save(&config).is_err());
        assert!(!manager.exists());

        let config = Config {
            chunk_size: 6000,
            ..Config::default()
        };
        assert!(manager.save(&config).is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), r#"{"provider": "libre"}"#).unwrap();

        let config = manager.load().unwrap();
        assert_eq!(config.provider, ProviderKind::LibreTranslate);
        assert_eq!(config.max_history, DEFAULT_MAX_HISTORY);
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), r#"{"provider": "babelfish"}"#).unwrap();

        let err = manager.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config {
            api_key: Some("sk-very-secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    #[serial]
    fn test_get_api_key_prefers_environment() {
        unsafe {
            std::env::set_var("XLATE_TEST_KEY", "from-env");
        }

        let config = Config {
            api_key: Some("from-file".to_string()),
            api_key_env: Some("XLATE_TEST_KEY".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.get_api_key(ProviderKind::Google),
            Some("from-env".to_string())
        );

        unsafe {
            std::env::remove_var("XLATE_TEST_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_get_api_key_falls_back_to_file() {
        let saved: Vec<_> = [ProviderKind::Google.api_key_env(), GENERIC_API_KEY_ENV]
            .iter()
            .map(|v| (*v, std::env::var(v).ok()))
            .collect();
        for (var, _) in &saved {
            unsafe { std::env::remove_var(var) };
        }

        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.get_api_key(ProviderKind::Google),
            Some("from-file".to_string())
        );
        // the stored key belongs to the configured provider only
        assert_eq!(config.get_api_key(ProviderKind::LibreTranslate), None);

        for (var, value) in saved {
            if let Some(value) = value {
                unsafe { std::env::set_var(var, value) };
            }
        }
    }

    #[test]
    fn test_resolve_config_falls_back_to_file() {
        let config = Config {
            default_source: "de".to_string(),
            default_target: "fr".to_string(),
            ..Config::default()
        };

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert_eq!(resolved.provider, ProviderKind::Google);
        assert_eq!(resolved.source, "de");
        assert_eq!(resolved.target, "fr");
        assert!(resolved.history_enabled);
        assert_eq!(resolved.settings.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_resolve_config_normalizes_codes() {
        let options = ResolveOptions {
            target: Some("ZH-tw".to_string()),
            ..ResolveOptions::default()
        };
        let resolved = resolve_config(&options, &Config::default()).unwrap();
        assert_eq!(resolved.target, "zh-TW");
    }

    #[test]
    fn test_resolve_config_rejects_invalid_language() {
        let options = ResolveOptions {
            target: Some("invalid_lang".to_string()),
            ..ResolveOptions::default()
        };
        let err = resolve_config(&options, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid language code"));
    }

    #[test]
    fn test_resolve_config_rejects_same_languages() {
        let options = ResolveOptions {
            source: Some("en".to_string()),
            target: Some("EN".to_string()),
            ..ResolveOptions::default()
        };
        assert!(resolve_config(&options, &Config::default()).is_err());
    }

    #[test]
    fn test_resolve_config_history_flags() {
        let options = ResolveOptions {
            no_history: true,
            ..ResolveOptions::default()
        };
        assert!(!resolve_config(&options, &Config::default()).unwrap().history_enabled);

        let config = Config {
            max_history: 0,
            ..Config::default()
        };
        assert!(!resolve_config(&ResolveOptions::default(), &config).unwrap().history_enabled);
    }

    #[test]
    fn test_resolve_config_endpoint_only_for_configured_provider() {
        let config = Config {
            provider: ProviderKind::LibreTranslate,
            endpoint: Some("http://localhost:5000".to_string()),
            ..Config::default()
        };

        let own = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(own.settings.endpoint.as_deref(), Some("http://localhost:5000"));

        let options = ResolveOptions {
            provider: Some(ProviderKind::DeepL),
            ..ResolveOptions::default()
        };
        let other = resolve_config(&options, &config).unwrap();
        assert!(other.settings.endpoint.is_none());
    }
}
