//! Where non-translation output goes.
//!
//! stdout carries only translations, language tables and history so it can
//! be piped. Status lines, progress bars and errors use stderr. `--quiet`
//! silences status lines; `NO_COLOR` or `--quiet` turns colors off.

use std::sync::OnceLock;

static SETTINGS: OnceLock<OutputConfig> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub quiet: bool,
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_flags(false)
    }
}

impl OutputConfig {
    /// Settings for the `--quiet` flag, honouring a non-empty `NO_COLOR`
    /// (<https://no-color.org/>).
    pub fn from_flags(quiet: bool) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            quiet,
            no_color: quiet || no_color_env,
        }
    }
}

/// Installs the process-wide settings. Only the first call has an effect.
pub fn init(config: OutputConfig) {
    if SETTINGS.set(config).is_err() {
        tracing::debug!("output settings already initialised");
    }
}

pub fn config() -> OutputConfig {
    *SETTINGS.get_or_init(OutputConfig::default)
}

pub fn is_quiet() -> bool {
    config().quiet
}

pub fn is_no_color() -> bool {
    config().no_color
}

/// `eprintln!` unless `--quiet` is set.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}
