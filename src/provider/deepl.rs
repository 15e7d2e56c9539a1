//! DeepL API v2.

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

const FREE_ENDPOINT: &str = "https://api-free.deepl.com";
const PRO_ENDPOINT: &str = "https://api.deepl.com";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    text: [&'a str; 1],
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslatedResponse {
    translations: Vec<TranslationResponse>,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    language: String,
}

pub struct DeepLAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl DeepLAdapter {
    pub fn new(client: Client, settings: &ProviderSettings) -> Self {
        let endpoint = settings.endpoint.clone().unwrap_or_else(|| {
            // free-tier keys carry a ":fx" suffix and only work on the free host
            let free = settings
                .api_key
                .as_deref()
                .is_some_and(|k| k.ends_with(":fx"));
            if free { FREE_ENDPOINT } else { PRO_ENDPOINT }.to_string()
        });
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    fn auth_header(&self) -> Result<String, TranslateError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| format!("DeepL-Auth-Key {k}"))
            .ok_or_else(|| TranslateError::Unauthorized {
                provider: ProviderKind::DeepL.to_string(),
                message: format!(
                    "missing API key (set {})",
                    ProviderKind::DeepL.api_key_env()
                ),
            })
    }

    async fn send_translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<Value, TranslateError> {
        let auth = self.auth_header()?;
        let url = format!("{}/v2/translate", self.endpoint);
        let body = TranslateBody {
            text: [text],
            target_lang: target_code(target),
            source_lang: source.map(source_code),
        };
        debug!(provider = "deepl", url = %url, chars = text.chars().count(), "sending translate request");

        let builder = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&body);
        http::send_json(ProviderKind::DeepL, builder).await
    }
}

/// DeepL source languages are bare upper-case codes.
fn source_code(code: &str) -> String {
    code.split('-').next().unwrap_or(code).to_ascii_uppercase()
}

/// DeepL has deprecated the bare `EN` and `PT` targets in favour of regional ones.
fn target_code(code: &str) -> String {
    match code {
        "en" => "EN-US".to_string(),
        "pt" => "PT-PT".to_string(),
        "zh" | "zh-CN" => "ZH-HANS".to_string(),
        "zh-TW" => "ZH-HANT".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

pub fn normalize(raw: &Value) -> Result<Normalized, TranslateError> {
    let response = TranslatedResponse::deserialize(raw)
        .map_err(|e| TranslateError::malformed(ProviderKind::DeepL, e.to_string()))?;
    let first = response
        .translations
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::malformed(ProviderKind::DeepL, "no translations returned"))?;

    Ok(Normalized {
        text: first.text.trim().to_string(),
        confidence: None,
        detected_source: first.detected_source_language,
    })
}

#[async_trait]
impl ProviderAdapter for DeepLAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepL
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<Value, TranslateError> {
        let source = (!request.is_auto_source()).then_some(request.source.as_str());
        self.send_translate(&request.text, source, &request.target)
            .await
    }

    fn detects_while_translating(&self) -> bool {
        true
    }

    /// DeepL has no detection endpoint; detection piggybacks on a translate
    /// call without a source language.
    async fn detect_language(&self, text: &str) -> Result<Detection, TranslateError> {
        let raw = self.send_translate(text, None, "en").await?;
        let detected = normalize(&raw)?.detected_source.ok_or_else(|| {
            TranslateError::malformed(ProviderKind::DeepL, "no detected_source_language")
        })?;
        let code = catalog_code(&detected).ok_or_else(|| {
            TranslateError::malformed(
                ProviderKind::DeepL,
                format!("unsupported detected language '{detected}'"),
            )
        })?;
        Ok(Detection {
            code,
            confidence: None,
        })
    }

    async fn fetch_languages(&self) -> Result<Vec<Language>, TranslateError> {
        let auth = self.auth_header()?;
        let url = Url::parse_with_params(
            &format!("{}/v2/languages", self.endpoint),
            &[("type", "target")],
        )
        .map_err(|e| TranslateError::Unreachable {
            provider: ProviderKind::DeepL.to_string(),
            message: format!("invalid endpoint: {e}"),
        })?;

        let builder = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, auth);
        let raw = http::send_json(ProviderKind::DeepL, builder).await?;
        let entries = Vec::<LanguageEntry>::deserialize(&raw)
            .map_err(|e| TranslateError::malformed(ProviderKind::DeepL, e.to_string()))?;

        Ok(catalog_from_codes(
            ProviderKind::DeepL,
            entries.into_iter().map(|e| e.language),
        ))
    }
}
