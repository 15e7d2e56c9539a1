//! Single-translation orchestration: validation, detection, provider call,
//! result shaping and history logging.

use tracing::{debug, warn};

use super::language::{self, AUTO, FALLBACK_LANGUAGE};
use super::request::{TranslationRequest, TranslationResult, now_timestamp};
use crate::config::DEFAULT_MAX_TEXT_LENGTH;
use crate::error::TranslateError;
use crate::history::{HistoryRecord, HistoryStore};
use crate::provider::{ProviderAdapter, ProviderKind};

/// Translates text through one provider adapter.
///
/// Holds no per-call state; every call validates, translates and (when a
/// history store is attached) records independently.
pub struct Pipeline {
    adapter: Box<dyn ProviderAdapter>,
    history: Option<HistoryStore>,
    max_text_length: usize,
}

impl Pipeline {
    pub fn new(adapter: Box<dyn ProviderAdapter>) -> Self {
        Self {
            adapter,
            history: None,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    #[must_use]
    pub const fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    /// Attaches a history store; successful translations are appended to it.
    #[must_use]
    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.adapter.kind()
    }

    pub fn adapter(&self) -> &dyn ProviderAdapter {
        self.adapter.as_ref()
    }

    pub const fn history(&self) -> Option<&HistoryStore> {
        self.history.as_ref()
    }

    pub const fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    /// Translates `text` and records the result in history.
    ///
    /// A history write failure is logged and never fails the call.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult, TranslateError> {
        let result = self.translate_segment(text, source, target).await?;
        self.record(text, &result);
        Ok(result)
    }

    /// Translates `text` without touching history.
    pub async fn translate_segment(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult, TranslateError> {
        self.validate_text(text)?;
        let target = language::validate_target(target)?;
        let source = language::validate_source(source)?;
        if source != AUTO && source == target {
            return Err(TranslateError::validation(format!(
                "Source and target language are both '{source}'"
            )));
        }

        if source == AUTO && self.adapter.detects_while_translating() {
            return self.translate_detecting(text, target).await;
        }

        let (resolved_source, detected_confidence) = if source == AUTO {
            self.detect(text).await
        } else {
            (source.to_string(), None)
        };

        if resolved_source == target {
            debug!(language = %target, "text is already in the target language");
            return Ok(self.shape(text.trim().to_string(), resolved_source, target, detected_confidence));
        }

        let request = TranslationRequest {
            text: text.to_string(),
            source: resolved_source,
            target: target.to_string(),
            provider: self.provider(),
        };
        let raw = self.adapter.translate(&request).await?;
        let normalized = self.adapter.normalize(&raw)?;

        Ok(self.shape(
            normalized.text,
            request.source,
            target,
            normalized.confidence.or(detected_confidence),
        ))
    }

    /// One request without a source language; the provider reports what it
    /// detected alongside the translation.
    async fn translate_detecting(
        &self,
        text: &str,
        target: &str,
    ) -> Result<TranslationResult, TranslateError> {
        let request = TranslationRequest {
            text: text.to_string(),
            source: AUTO.to_string(),
            target: target.to_string(),
            provider: self.provider(),
        };
        let raw = self.adapter.translate(&request).await?;
        let normalized = self.adapter.normalize(&raw)?;

        let detected = normalized
            .detected_source
            .as_deref()
            .and_then(language::resolve_provider_code);
        let (resolved_source, confidence) = match detected {
            Some(code) => {
                debug!(language = code, "provider detected source language");
                (code.to_string(), normalized.confidence)
            }
            None => {
                warn!(
                    reported = ?normalized.detected_source,
                    "provider did not report a supported source language; assuming '{FALLBACK_LANGUAGE}'"
                );
                (FALLBACK_LANGUAGE.to_string(), Some(0.0))
            }
        };

        if resolved_source == target {
            debug!(language = %target, "text is already in the target language");
            return Ok(self.shape(text.trim().to_string(), resolved_source, target, confidence));
        }
        Ok(self.shape(normalized.text, resolved_source, target, confidence))
    }

    /// Detects the language of `text`, falling back to English with zero
    /// confidence when detection fails.
    pub async fn detect(&self, text: &str) -> (String, Option<f64>) {
        match self.adapter.detect_language(text).await {
            Ok(detection) => match language::resolve_provider_code(&detection.code) {
                Some(code) => {
                    debug!(language = code, confidence = ?detection.confidence, "detected source language");
                    (code.to_string(), detection.confidence.map(|c| c.clamp(0.0, 1.0)))
                }
                None => {
                    warn!(code = %detection.code, "detected language is not supported; assuming '{FALLBACK_LANGUAGE}'");
                    (FALLBACK_LANGUAGE.to_string(), Some(0.0))
                }
            },
            Err(e) => {
                warn!(error = %e, "language detection failed; assuming '{FALLBACK_LANGUAGE}'");
                (FALLBACK_LANGUAGE.to_string(), Some(0.0))
            }
        }
    }

    /// Appends a result to history if a store is attached.
    pub fn record(&self, source_text: &str, result: &TranslationResult) {
        if let Some(history) = &self.history
            && let Err(e) = history.append(HistoryRecord::new(source_text.to_string(), result.clone()))
        {
            warn!(error = %e, "failed to write translation history");
        }
    }

    fn validate_text(&self, text: &str) -> Result<(), TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::validation("Input text is empty"));
        }
        let length = text.chars().count();
        if length > self.max_text_length {
            return Err(TranslateError::validation(format!(
                "Input text is too long ({length} characters, maximum {}).\n\n\
                 Use --file to translate long text in chunks.",
                self.max_text_length
            )));
        }
        Ok(())
    }

    fn shape(
        &self,
        translated_text: String,
        resolved_source: String,
        target: &str,
        confidence: Option<f64>,
    ) -> TranslationResult {
        TranslationResult {
            translated_text,
            resolved_source,
            target: target.to_string(),
            confidence,
            provider: self.provider(),
            timestamp: now_timestamp(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::{Detection, Normalized};
    use crate::translation::Language;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct MockAdapter {
        response: Result<Value, TranslateError>,
        detection: Result<Detection, TranslateError>,
        detects_while_translating: bool,
        calls: Arc<Mutex<Vec<TranslationRequest>>>,
    }

    impl MockAdapter {
        fn new(response: Value) -> Self {
            Self {
                response: Ok(response),
                detection: Ok(Detection {
                    code: "en".to_string(),
                    confidence: Some(0.97),
                }),
                detects_while_translating: false,
                calls: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Google
        }

        async fn translate(&self, request: &TranslationRequest) -> Result<Value, TranslateError> {
            self.calls.lock().unwrap().push(request.clone());
            self.response.clone()
        }

        fn normalize(&self, raw: &Value) -> Result<Normalized, TranslateError> {
            ProviderKind::Google.normalize(raw)
        }

        async fn detect_language(&self, _text: &str) -> Result<Detection, TranslateError> {
            self.detection.clone()
        }

        fn detects_while_translating(&self) -> bool {
            self.detects_while_translating
        }

        async fn fetch_languages(&self) -> Result<Vec<Language>, TranslateError> {
            Ok(Vec::new())
        }
    }

    fn hola() -> Value {
        json!({"data": {"translations": [{"translatedText": "Hola", "detectedSourceLanguage": "en"}]}})
    }

    #[tokio::test]
    async fn test_auto_source_resolves_through_detection() {
        let pipeline = Pipeline::new(Box::new(MockAdapter::new(hola())));

        let result = pipeline.translate("Hello", "auto", "es").await.unwrap();

        assert_eq!(result.translated_text, "Hola");
        assert_eq!(result.resolved_source, "en");
        assert_eq!(result.target, "es");
        assert_eq!(result.provider, ProviderKind::Google);
        assert_eq!(result.confidence, Some(0.97));
    }

    #[tokio::test]
    async fn test_detection_failure_falls_back_to_english() {
        let mut adapter = MockAdapter::new(hola());
        adapter.detection = Err(TranslateError::Unreachable {
            provider: "google".to_string(),
            message: "timed out".to_string(),
        });
        let calls = Arc::clone(&adapter.calls);
        let pipeline = Pipeline::new(Box::new(adapter));

        let result = pipeline.translate("Hello", "auto", "es").await.unwrap();

        assert_eq!(result.resolved_source, "en");
        assert_eq!(result.confidence, Some(0.0));
        assert_eq!(calls.lock().unwrap()[0].source, "en");
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_without_network() {
        let adapter = MockAdapter::new(hola());
        let calls = Arc::clone(&adapter.calls);
        let pipeline = Pipeline::new(Box::new(adapter));

        let err = pipeline.translate("   \n", "en", "es").await.unwrap_err();

        assert!(err.is_validation());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_text_is_rejected() {
        let pipeline = Pipeline::new(Box::new(MockAdapter::new(hola()))).with_max_text_length(10);

        let err = pipeline
            .translate("this is longer than ten", "en", "es")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[tokio::test]
    async fn test_invalid_target_is_rejected_without_network() {
        let adapter = MockAdapter::new(hola());
        let calls = Arc::clone(&adapter.calls);
        let pipeline = Pipeline::new(Box::new(adapter));

        assert!(pipeline.translate("Hello", "en", "xx").await.unwrap_err().is_validation());
        assert!(pipeline.translate("Hello", "en", "auto").await.unwrap_err().is_validation());
        assert!(pipeline.translate("Hello", "en", "en").await.unwrap_err().is_validation());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mut adapter = MockAdapter::new(hola());
        adapter.response = Err(TranslateError::RateLimited {
            provider: "google".to_string(),
            retry_after: None,
        });
        let pipeline = Pipeline::new(Box::new(adapter));

        let err = pipeline.translate("Hello", "en", "es").await.unwrap_err();
        assert!(matches!(err, TranslateError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_malformed_response_is_reported() {
        let pipeline = Pipeline::new(Box::new(MockAdapter::new(json!({"unexpected": true}))));

        let err = pipeline.translate("Hello", "en", "es").await.unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_successful_translation_is_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("history.json"), 10);
        let pipeline = Pipeline::new(Box::new(MockAdapter::new(hola()))).with_history(store);

        pipeline.translate("Hello", "en", "es").await.unwrap();

        let records = pipeline.history().unwrap().list(10, None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_text, "Hello");
        assert_eq!(records[0].result.translated_text, "Hola");
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_translation() {
        let temp_dir = TempDir::new().unwrap();
        // a directory where the history file should be makes every write fail
        let blocked = temp_dir.path().join("history.json");
        std::fs::create_dir_all(blocked.join("occupied")).unwrap();
        let store = HistoryStore::new(blocked, 10);
        let pipeline = Pipeline::new(Box::new(MockAdapter::new(hola()))).with_history(store);

        let result = pipeline.translate("Hello", "en", "es").await.unwrap();
        assert_eq!(result.translated_text, "Hola");
    }

    #[tokio::test]
    async fn test_segment_translation_skips_history() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().join("history.json"), 10);
        let pipeline = Pipeline::new(Box::new(MockAdapter::new(hola()))).with_history(store);

        pipeline.translate_segment("Hello", "en", "es").await.unwrap();

        assert!(pipeline.history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detected_target_language_skips_provider() {
        let mut adapter = MockAdapter::new(hola());
        adapter.detection = Ok(Detection {
            code: "es".to_string(),
            confidence: Some(0.9),
        });
        let calls = Arc::clone(&adapter.calls);
        let pipeline = Pipeline::new(Box::new(adapter));

        let result = pipeline.translate(" Hola ", "auto", "es").await.unwrap();

        assert_eq!(result.translated_text, "Hola");
        assert_eq!(result.resolved_source, "es");
        assert!(calls.lock().unwrap().is_empty());
    }

    fn unused_detection() -> Result<Detection, TranslateError> {
        Err(TranslateError::Unreachable {
            provider: "google".to_string(),
            message: "detection should not be called".to_string(),
        })
    }

    #[tokio::test]
    async fn test_inline_detection_uses_a_single_request() {
        let mut adapter = MockAdapter::new(json!({
            "data": {"translations": [{"translatedText": "Hola", "detectedSourceLanguage": "fr"}]}
        }));
        adapter.detects_while_translating = true;
        adapter.detection = unused_detection();
        let calls = Arc::clone(&adapter.calls);
        let pipeline = Pipeline::new(Box::new(adapter));

        let result = pipeline.translate("Bonjour", "auto", "es").await.unwrap();

        assert_eq!(result.translated_text, "Hola");
        assert_eq!(result.resolved_source, "fr");
        assert_eq!(result.confidence, None);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].source, AUTO);
    }

    #[tokio::test]
    async fn test_inline_detection_without_report_falls_back() {
        let mut adapter = MockAdapter::new(json!({
            "data": {"translations": [{"translatedText": "Hola"}]}
        }));
        adapter.detects_while_translating = true;
        adapter.detection = unused_detection();
        let pipeline = Pipeline::new(Box::new(adapter));

        let result = pipeline.translate("Hello", "auto", "es").await.unwrap();

        assert_eq!(result.translated_text, "Hola");
        assert_eq!(result.resolved_source, FALLBACK_LANGUAGE);
        assert_eq!(result.confidence, Some(0.0));
    }
}
