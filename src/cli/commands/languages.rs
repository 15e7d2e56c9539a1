use anyhow::Result;

use super::load_resolved;
use crate::config::ResolveOptions;
use crate::paths;
use crate::provider::{ProviderKind, build_adapter};
use crate::translation::LanguageRegistry;
use crate::ui::{Spinner, display_languages};

/// Prints the supported languages.
///
/// The built-in catalog is shown unless `live` is set or a provider is named,
/// in which case that provider's catalog is fetched (or served from cache).
pub async fn run_languages(provider: Option<ProviderKind>, live: bool) -> Result<()> {
    if !live && provider.is_none() {
        let languages = LanguageRegistry::without_cache()
            .supported_languages(None)
            .await;
        display_languages(&languages);
        return Ok(());
    }

    let resolved = load_resolved(&ResolveOptions {
        provider,
        ..ResolveOptions::default()
    })?;
    let adapter = build_adapter(resolved.provider, &resolved.settings)?;
    let registry = LanguageRegistry::new(paths::language_cache_file()?);

    let spinner = Spinner::new(&format!(
        "Fetching languages from {}...",
        resolved.provider.display_name()
    ));
    let languages = registry.supported_languages(Some(adapter.as_ref())).await;
    spinner.stop();

    display_languages(&languages);
    Ok(())
}
