//! Google Cloud Translation (Basic, v2).

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{
    Detection, Normalized, ProviderAdapter, ProviderKind, ProviderSettings, catalog_code,
    catalog_from_codes, http,
};
use crate::error::TranslateError;
use crate::translation::{Language, TranslationRequest};

const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedResponse {
    data: TranslationsData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationsData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Debug, Deserialize)]
struct DetectData {
    detections: Vec<Vec<DetectionEntry>>,
}

#[derive(Debug, Deserialize)]
struct DetectionEntry {
    language: String,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    data: LanguagesData,
}

#[derive(Debug, Deserialize)]
struct LanguagesData {
    languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    language: String,
}

pub struct GoogleAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleAdapter {
    pub fn new(client: Client, settings: &ProviderSettings) -> Self {
        let endpoint = settings
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, TranslateError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TranslateError::Unauthorized {
                provider: ProviderKind::Google.to_string(),
                message: format!(
                    "missing API key (set {})",
                    ProviderKind::Google.api_key_env()
                ),
            })
    }
}

/// Google accepts catalog codes as-is, except for the bare `zh` which it
/// only knows as `zh-CN`.
fn provider_code(code: &str) -> &str {
    if code == "zh" { "zh-CN" } else { code }
}

pub fn normalize(raw: &Value) -> Result<Normalized, TranslateError> {
    let response = TranslatedResponse::deserialize(raw)
        .map_err(|e| TranslateError::malformed(ProviderKind::Google, e.to_string()))?;
    let first = response
        .data
        .translations
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::malformed(ProviderKind::Google, "no translations returned"))?;

    Ok(Normalized {
        text: first.translated_text.trim().to_string(),
        confidence: None,
        detected_source: first.detected_source_language,
    })
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<Value, TranslateError> {
        let key = self.api_key()?;
        let body = TranslateBody {
            q: &request.text,
            target: provider_code(&request.target),
            source: (!request.is_auto_source()).then(|| provider_code(&request.source)),
            format: "text",
        };
        debug!(provider = "google", url = %self.endpoint, chars = request.text.chars().count(), "sending translate request");

        let builder = self
            .client
            .post(&self.endpoint)
            .header("X-goog-api-key", key)
            .json(&body);
        http::send_json(ProviderKind::Google, builder).await
    }

    async fn detect_language(&self, text: &str) -> Result<Detection, TranslateError> {
        let key = self.api_key()?;
        let url = format!("{}/detect", self.endpoint);
        debug!(provider = "google", url = %url, "sending detect request");

        let builder = self
            .client
            .post(&url)
            .header("X-goog-api-key", key)
            .json(&serde_json::json!({ "q": text }));
        let raw = http::send_json(ProviderKind::Google, builder).await?;

        let response = DetectResponse::deserialize(&raw)
            .map_err(|e| TranslateError::malformed(ProviderKind::Google, e.to_string()))?;
        let entry = response
            .data
            .detections
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| TranslateError::malformed(ProviderKind::Google, "no detections returned"))?;
        let code = catalog_code(&entry.language).ok_or_else(|| {
            TranslateError::malformed(
                ProviderKind::Google,
                format!("unsupported detected language '{}'", entry.language),
            )
        })?;

        Ok(Detection {
            code,
            confidence: entry.confidence.map(|c| c.clamp(0.0, 1.0)),
        })
    }

    async fn fetch_languages(&self) -> Result<Vec<Language>, TranslateError> {
        let key = self.api_key()?;
        let url = Url::parse_with_params(&format!("{}/languages", self.endpoint), &[("target", "en")])
            .map_err(|e| TranslateError::Unreachable {
                provider: ProviderKind::Google.to_string(),
                message: format!("invalid endpoint: {e}"),
            })?;

        let builder = self.client.get(url).header("X-goog-api-key", key);
        let raw = http::send_json(ProviderKind::Google, builder).await?;
        let response = LanguagesResponse::deserialize(&raw)
            .map_err(|e| TranslateError::malformed(ProviderKind::Google, e.to_string()))?;

        Ok(catalog_from_codes(
            ProviderKind::Google,
            response.data.languages.into_iter().map(|l| l.language),
        ))
    }
}
