//! Azure AI Translator (Text Translation v3).

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{
    Detection, Normalized, ProviderAdapter, ProviderKind, ProviderSettings, catalog_code,
    catalog_from_codes, http,
};
use crate::error::TranslateError;
use crate::translation::{Language, TranslationRequest};

const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";
const API_VERSION: &str = "3.0";

#[derive(Debug, Serialize)]
struct TextItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateItem {
    #[serde(default)]
    detected_language: Option<DetectedLanguage>,
    translations: Vec<TranslationText>,
}

#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: String,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TranslationText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    translation: BTreeMap<String, IgnoredAny>,
}

pub struct AzureAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    region: Option<String>,
}

impl AzureAdapter {
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
            region: settings.region.clone(),
        }
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, TranslateError> {
        let mut query = vec![("api-version", API_VERSION)];
        query.extend_from_slice(params);
        Url::parse_with_params(&format!("{}/{path}", self.endpoint), &query).map_err(|e| {
            TranslateError::Unreachable {
                provider: ProviderKind::Azure.to_string(),
                message: format!("invalid endpoint: {e}"),
            }
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, TranslateError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TranslateError::Unauthorized {
                provider: ProviderKind::Azure.to_string(),
                message: format!(
                    "missing API key (set {})",
                    ProviderKind::Azure.api_key_env()
                ),
            })?;
        let builder = builder.header("Ocp-Apim-Subscription-Key", key);
        Ok(match &self.region {
            Some(region) => builder.header("Ocp-Apim-Subscription-Region", region),
            None => builder,
        })
    }
}

fn provider_code(code: &str) -> &str {
    match code {
        "zh" | "zh-CN" => "zh-Hans",
        "zh-TW" => "zh-Hant",
        "pt-BR" | "en-US" | "en-GB" => code.split('-').next().unwrap_or(code),
        "pt-PT" => "pt-pt",
        "no" => "nb",
        "tl" => "fil",
        other => other,
    }
}

pub fn normalize(raw: &Value) -> Result<Normalized, TranslateError> {
    let items = Vec::<TranslateItem>::deserialize(raw)
        .map_err(|e| TranslateError::malformed(ProviderKind::Azure, e.to_string()))?;
    let item = items
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::malformed(ProviderKind::Azure, "empty response array"))?;
    let text = item
        .translations
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::malformed(ProviderKind::Azure, "no translations returned"))?
        .text;

    let (detected_source, confidence) = item
        .detected_language
        .map_or((None, None), |d| (Some(d.language), d.score));

    Ok(Normalized {
        text: text.trim().to_string(),
        confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
        detected_source,
    })
}

#[async_trait]
impl ProviderAdapter for AzureAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Azure
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<Value, TranslateError> {
        let mut params = vec![("to", provider_code(&request.target))];
        if !request.is_auto_source() {
            params.push(("from", provider_code(&request.source)));
        }
        let url = self.url("translate", &params)?;
        debug!(provider = "azure", url = %url, chars = request.text.chars().count(), "sending translate request");

        let builder = self
            .authorize(self.client.post(url))?
            .json(&[TextItem {
                text: &request.text,
            }]);
        http::send_json(ProviderKind::Azure, builder).await
    }

    async fn detect_language(&self, text: &str) -> Result<Detection, TranslateError> {
        let url = self.url("detect", &[])?;
        let builder = self
            .authorize(self.client.post(url))?
            .json(&[TextItem { text }]);
        let raw = http::send_json(ProviderKind::Azure, builder).await?;

        let detected = Vec::<DetectedLanguage>::deserialize(&raw)
            .map_err(|e| TranslateError::malformed(ProviderKind::Azure, e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::malformed(ProviderKind::Azure, "no detections returned"))?;
        let code = catalog_code(&detected.language).ok_or_else(|| {
            TranslateError::malformed(
                ProviderKind::Azure,
                format!("unsupported detected language '{}'", detected.language),
            )
        })?;

        Ok(Detection {
            code,
            confidence: detected.score.map(|s| s.clamp(0.0, 1.0)),
        })
    }

    async fn fetch_languages(&self) -> Result<Vec<Language>, TranslateError> {
        // the catalog endpoint is public; no credential needed
        let url = self.url("languages", &[("scope", "translation")])?;
        let raw = http::send_json(ProviderKind::Azure, self.client.get(url)).await?;
        let response = LanguagesResponse::deserialize(&raw)
            .map_err(|e| TranslateError::malformed(ProviderKind::Azure, e.to_string()))?;

        Ok(catalog_from_codes(
            ProviderKind::Azure,
            response.translation.into_keys(),
        ))
    }
}
