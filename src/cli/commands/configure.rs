//! Setup wizard and configuration display.

use anyhow::Result;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use tracing::warn;

use crate::config::{Config, ConfigManager};
use crate::provider::ProviderKind;
use crate::translation::{AUTO, Language, static_catalog};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the setup wizard, or prints the current configuration with `show`.
pub fn run_configure(show: bool) -> Result<()> {
    let manager = ConfigManager::new()?;
    if show {
        let config = manager.load()?;
        print_config(&config, &manager);
        return Ok(());
    }
    handle_prompt_cancellation(|| run_wizard(&manager))
}

fn run_wizard(manager: &ConfigManager) -> Result<()> {
    let mut config = manager.load().unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "existing config is unreadable; starting from defaults");
        Config::default()
    });

    print_config(&config, manager);

    let provider = select_provider(config.provider)?;
    if provider != config.provider {
        config.api_key = None;
        config.api_key_env = None;
        config.endpoint = None;
        config.region = None;
    }
    config.provider = provider;

    if let Some(key) = prompt_api_key(provider, config.api_key.is_some())? {
        config.api_key = Some(key);
    }
    match provider {
        ProviderKind::LibreTranslate => {
            config.endpoint = prompt_optional(
                "LibreTranslate server:",
                config.endpoint.as_deref(),
                "Leave empty for https://libretranslate.com",
            )?;
        }
        ProviderKind::Azure => {
            config.region = prompt_optional(
                "Azure resource region:",
                config.region.as_deref(),
                "Required for regional resources, e.g. westeurope; leave empty for global",
            )?;
        }
        ProviderKind::Google | ProviderKind::DeepL => {}
    }

    config.default_source = select_language("Default source language:", &config.default_source, true)?;
    config.default_target = select_language("Default target language:", &config.default_target, false)?;
    config.history_enabled = Confirm::new("Keep a history of translations?")
        .with_default(config.history_enabled)
        .prompt()?;

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );
    Ok(())
}

fn print_config(config: &Config, manager: &ConfigManager) {
    let not_set = || Style::secondary("(not set)");

    println!("{}", Style::header("Current configuration"));
    println!(
        "  {}         {}",
        Style::label("provider"),
        Style::value(config.provider)
    );
    println!(
        "  {}           {}",
        Style::label("source"),
        Style::code(&config.default_source)
    );
    println!(
        "  {}           {}",
        Style::label("target"),
        Style::code(&config.default_target)
    );
    println!(
        "  {}          {}",
        Style::label("api key"),
        if config.get_api_key(config.provider).is_some() {
            Style::success("(set)")
        } else {
            not_set()
        }
    );
    println!(
        "  {}         {}",
        Style::label("endpoint"),
        config.endpoint.as_deref().map_or_else(not_set, Style::secondary)
    );
    if config.provider == ProviderKind::Azure {
        println!(
            "  {}           {}",
            Style::label("region"),
            config.get_region().map_or_else(not_set, Style::secondary)
        );
    }
    println!(
        "  {}          {}",
        Style::label("history"),
        Style::value(if config.history_active() {
            format!("on (last {})", config.max_history)
        } else {
            "off".to_string()
        })
    );
    println!(
        "  {}  {}",
        Style::label("max text length"),
        Style::value(config.max_text_length)
    );
    println!(
        "  {}       {}",
        Style::label("chunk size"),
        Style::value(config.chunk_size)
    );
    println!(
        "  {}          {}",
        Style::label("timeout"),
        Style::value(format!("{}s", config.timeout_secs))
    );
    println!(
        "  {}             {}",
        Style::label("file"),
        Style::secondary(manager.config_path().display())
    );
    println!();
}

fn select_provider(current: ProviderKind) -> Result<ProviderKind> {
    let options: Vec<String> = ProviderKind::ALL
        .iter()
        .map(|kind| format!("{} - {}", kind.as_str(), kind.display_name()))
        .collect();
    let default_index = ProviderKind::ALL
        .iter()
        .position(|kind| *kind == current)
        .unwrap_or(0);

    let selection = Select::new("Translation provider:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    // split() always yields at least one element
    let name = selection.split(" - ").next().unwrap_or(&selection);
    Ok(name.parse()?)
}

/// Asks for an API key. An empty answer keeps whatever is configured.
fn prompt_api_key(provider: ProviderKind, has_stored_key: bool) -> Result<Option<String>> {
    let help = if has_stored_key {
        "Leave empty to keep the stored key".to_string()
    } else if provider.requires_api_key() {
        format!("Leave empty to use the {} environment variable", provider.api_key_env())
    } else {
        "Optional for self-hosted servers; leave empty for none".to_string()
    };

    let key = Password::new(&format!("{} API key:", provider.display_name()))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(&help)
        .prompt()?;

    let key = key.trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}

fn prompt_optional(message: &str, current: Option<&str>, help: &str) -> Result<Option<String>> {
    let mut prompt = Text::new(message).with_help_message(help);
    if let Some(current) = current {
        prompt = prompt.with_default(current);
    }
    let value = prompt.prompt()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn select_language(message: &str, current: &str, allow_auto: bool) -> Result<String> {
    let catalog: Vec<Language> = static_catalog();
    let mut options: Vec<String> = Vec::with_capacity(catalog.len() + 1);
    if allow_auto {
        options.push(format!("{AUTO} - Detect automatically"));
    }
    options.extend(
        catalog
            .iter()
            .map(|l| format!("{} - {} ({})", l.code, l.name, l.native_name)),
    );

    let default_index = options
        .iter()
        .position(|o| o.split(" - ").next() == Some(current))
        .unwrap_or(0);

    let selection = Select::new(message, options)
        .with_starting_cursor(default_index)
        .prompt()?;

    let code = selection.split(" - ").next().unwrap_or(&selection);
    Ok(code.to_string())
}
