//! Translation provider adapters.
//!
//! Each supported service is one [`ProviderAdapter`] implementation. The
//! pipeline only talks to the trait; adding a provider means adding a module
//! and a [`ProviderKind`] variant.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::TranslateError;
use crate::translation::{Language, TranslationRequest};

mod azure;
mod deepl;
mod google;
mod http;
mod libre;

pub use azure::AzureAdapter;
pub use deepl::DeepLAdapter;
pub use google::GoogleAdapter;
pub use libre::LibreTranslateAdapter;

/// Default request timeout for provider calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    #[serde(rename = "deepl")]
    DeepL,
    Azure,
    #[serde(alias = "libre")]
    LibreTranslate,
}

impl ProviderKind {
    pub const ALL: [Self; 4] = [Self::Google, Self::DeepL, Self::Azure, Self::LibreTranslate];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::DeepL => "deepl",
            Self::Azure => "azure",
            Self::LibreTranslate => "libretranslate",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google Cloud Translation",
            Self::DeepL => "DeepL",
            Self::Azure => "Azure AI Translator",
            Self::LibreTranslate => "LibreTranslate",
        }
    }

    /// Conventional environment variable holding this provider's API key.
    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::Google => "GOOGLE_API_KEY",
            Self::DeepL => "DEEPL_API_KEY",
            Self::Azure => "AZURE_TRANSLATOR_KEY",
            Self::LibreTranslate => "LIBRETRANSLATE_API_KEY",
        }
    }

    /// Whether calls fail without a credential.
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::LibreTranslate)
    }

    /// Extracts the translated text from a raw response of this provider.
    pub fn normalize(self, raw: &Value) -> Result<Normalized, TranslateError> {
        match self {
            Self::Google => google::normalize(raw),
            Self::DeepL => deepl::normalize(raw),
            Self::Azure => azure::normalize(raw),
            Self::LibreTranslate => libre::normalize(raw),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "deepl" => Ok(Self::DeepL),
            "azure" => Ok(Self::Azure),
            "libretranslate" | "libre" => Ok(Self::LibreTranslate),
            other => Err(TranslateError::validation(format!(
                "Unknown provider: '{other}'\n\n\
                 Supported providers: google, deepl, azure, libretranslate"
            ))),
        }
    }
}

/// Provider-independent view of a translate response.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    pub confidence: Option<f64>,
    /// Source language the provider reports having detected, in provider spelling.
    pub detected_source: Option<String>,
}

/// Result of a language detection call.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Catalog code of the detected language.
    pub code: String,
    pub confidence: Option<f64>,
}

/// Everything needed to construct an adapter.
#[derive(Clone, Default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    /// Base URL override.
    pub endpoint: Option<String>,
    /// Azure resource region.
    pub region: Option<String>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Common interface of every translation provider.
///
/// Adapters never retry; retry policy belongs to the caller.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Sends the request and returns the decoded response body.
    async fn translate(&self, request: &TranslationRequest) -> Result<Value, TranslateError>;

    /// Extracts the translated text from a response returned by [`Self::translate`].
    fn normalize(&self, raw: &Value) -> Result<Normalized, TranslateError> {
        self.kind().normalize(raw)
    }

    async fn detect_language(&self, text: &str) -> Result<Detection, TranslateError>;

    /// True when a translate request without a source language reports the
    /// detected source in [`Normalized::detected_source`], making a separate
    /// detection call redundant.
    fn detects_while_translating(&self) -> bool {
        false
    }

    /// Queries the provider's live language catalog.
    async fn fetch_languages(&self) -> Result<Vec<Language>, TranslateError>;
}

/// Builds the adapter for `kind`.
pub fn build_adapter(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> Result<Box<dyn ProviderAdapter>, TranslateError> {
    let client = http::build_client(kind, settings.timeout.unwrap_or(DEFAULT_TIMEOUT))?;
    let adapter: Box<dyn ProviderAdapter> = match kind {
        ProviderKind::Google => Box::new(GoogleAdapter::new(client, settings)),
        ProviderKind::DeepL => Box::new(DeepLAdapter::new(client, settings)),
        ProviderKind::Azure => Box::new(AzureAdapter::new(client, settings)),
        ProviderKind::LibreTranslate => Box::new(LibreTranslateAdapter::new(client, settings)),
    };
    Ok(adapter)
}

/// Maps a provider-reported code onto the catalog, or `None` when it has no counterpart.
pub(crate) fn catalog_code(code: &str) -> Option<String> {
    crate::translation::language::resolve_provider_code(code).map(str::to_string)
}

/// Restricts the built-in catalog to the codes a provider offers.
///
/// Provider codes go through [`catalog_code`]; codes with no catalog
/// counterpart are dropped, so every listed entry passes validation.
pub(crate) fn catalog_from_codes<I>(provider: ProviderKind, codes: I) -> Vec<Language>
where
    I: IntoIterator<Item = String>,
{
    let mut offered = HashSet::new();
    for code in codes {
        match catalog_code(&code) {
            Some(known) => {
                offered.insert(known);
            }
            None => debug!(%provider, code = %code, "skipping language missing from the catalog"),
        }
    }
    crate::translation::language::static_catalog()
        .into_iter()
        .filter(|language| offered.contains(&language.code))
        .collect()
}
