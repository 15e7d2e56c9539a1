//! LibreTranslate, hosted or self-hosted.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{
    Detection, Normalized, ProviderAdapter, ProviderKind, ProviderSettings, catalog_code,
    catalog_from_codes, http,
};
use crate::error::TranslateError;
use crate::translation::{Language, TranslationRequest};

const DEFAULT_ENDPOINT: &str = "https://libretranslate.com";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DetectBody<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedResponse {
    translated_text: String,
    #[serde(default)]
    detected_language: Option<DetectedLanguage>,
}

#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: String,
    /// Percentage, 0 to 100.
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    code: String,
}

pub struct LibreTranslateAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl LibreTranslateAdapter {
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
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
        }
    }
}

/// LibreTranslate knows base codes only, plus `zh-Hant` for traditional Chinese.
fn provider_code(code: &str) -> &str {
    match code {
        "zh-TW" => "zh-Hant",
        "zh-CN" => "zh",
        other => other.split('-').next().unwrap_or(other),
    }
}

fn scale_confidence(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

pub fn normalize(raw: &Value) -> Result<Normalized, TranslateError> {
    let response = TranslatedResponse::deserialize(raw)
        .map_err(|e| TranslateError::malformed(ProviderKind::LibreTranslate, e.to_string()))?;
    let (detected_source, confidence) = response
        .detected_language
        .map_or((None, None), |d| {
            (Some(d.language), d.confidence.map(scale_confidence))
        });

    Ok(Normalized {
        text: response.translated_text.trim().to_string(),
        confidence,
        detected_source,
    })
}

#[async_trait]
impl ProviderAdapter for LibreTranslateAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::LibreTranslate
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<Value, TranslateError> {
        let url = format!("{}/translate", self.endpoint);
        let source = if request.is_auto_source() {
            "auto"
        } else {
            provider_code(&request.source)
        };
        let body = TranslateBody {
            q: &request.text,
            source,
            target: provider_code(&request.target),
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        debug!(provider = "libretranslate", url = %url, chars = request.text.chars().count(), "sending translate request");

        http::send_json(ProviderKind::LibreTranslate, self.client.post(&url).json(&body)).await
    }

    async fn detect_language(&self, text: &str) -> Result<Detection, TranslateError> {
        let url = format!("{}/detect", self.endpoint);
        let body = DetectBody {
            q: text,
            api_key: self.api_key.as_deref(),
        };
        let raw =
            http::send_json(ProviderKind::LibreTranslate, self.client.post(&url).json(&body))
                .await?;

        let detected = Vec::<DetectedLanguage>::deserialize(&raw)
            .map_err(|e| TranslateError::malformed(ProviderKind::LibreTranslate, e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                TranslateError::malformed(ProviderKind::LibreTranslate, "no detections returned")
            })?;
        let code = catalog_code(&detected.language).ok_or_else(|| {
            TranslateError::malformed(
                ProviderKind::LibreTranslate,
                format!("unsupported detected language '{}'", detected.language),
            )
        })?;

        Ok(Detection {
            code,
            confidence: detected.confidence.map(scale_confidence),
        })
    }

    async fn fetch_languages(&self) -> Result<Vec<Language>, TranslateError> {
        let url = format!("{}/languages", self.endpoint);
        let raw = http::send_json(ProviderKind::LibreTranslate, self.client.get(&url)).await?;
        let entries = Vec::<LanguageEntry>::deserialize(&raw)
            .map_err(|e| TranslateError::malformed(ProviderKind::LibreTranslate, e.to_string()))?;

        Ok(catalog_from_codes(
            ProviderKind::LibreTranslate,
            entries.into_iter().map(|e| e.code),
        ))
    }
}
