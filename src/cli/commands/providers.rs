//! Provider listing command handler.

use anyhow::Result;
use std::fmt::Write as _;

use crate::config::{Config, ConfigManager, GENERIC_API_KEY_ENV};
use crate::provider::ProviderKind;
use crate::ui::Style;

/// Prints every supported provider with its credential status.
pub fn print_providers() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    println!("{}", render_providers(&config));
    Ok(())
}

/// Lists providers; credentials are reported as present or missing, never shown.
pub fn render_providers(config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", Style::header("Translation providers"));

    for kind in ProviderKind::ALL {
        let marker = if kind == config.provider {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {}{marker}  {}",
            Style::value(kind.as_str()),
            Style::secondary(kind.display_name())
        );
        let _ = writeln!(out, "    {}  {}", Style::label("key"), credential_status(config, kind));
        if kind == config.provider
            && let Some(endpoint) = &config.endpoint
        {
            let _ = writeln!(out, "    {}  {}", Style::label("endpoint"), Style::secondary(endpoint));
        }
    }

    let _ = write!(
        out,
        "\n{}",
        Style::hint(format!(
            "Keys are read from the provider variable, then {GENERIC_API_KEY_ENV}, then the config file."
        ))
    );
    out
}

fn credential_status(config: &Config, kind: ProviderKind) -> String {
    if config.get_api_key(kind).is_some() {
        Style::success("available")
    } else if !kind.requires_api_key() {
        Style::secondary("not required")
    } else {
        format!(
            "{} {}",
            Style::warning("missing"),
            Style::secondary(format!("(set {})", kind.api_key_env()))
        )
    }
}
