use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::ProviderKind;

/// A validated translation request, ready to hand to a provider adapter.
///
/// `source` is either a catalog code or `auto`; `target` is never `auto`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source: String,
    pub target: String,
    pub provider: ProviderKind,
}

impl TranslationRequest {
    /// Returns `true` when the provider should detect the source language itself.
    pub fn is_auto_source(&self) -> bool {
        self.source == super::language::AUTO
    }
}

/// The outcome of a single translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub resolved_source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub provider: ProviderKind,
    /// RFC 3339 / ISO-8601 timestamp in UTC.
    pub timestamp: String,
}

/// Current time formatted the way results and history records store it.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
