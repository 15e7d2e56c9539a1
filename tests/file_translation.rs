#![allow(clippy::unwrap_used)]
//! End-to-end file translation against a local LibreTranslate-shaped server.

mod common;

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use common::{MockResponse, MockServer};
use xlate_cli::error::TranslateError;
use xlate_cli::file::FileTranslator;
use xlate_cli::history::HistoryStore;
use xlate_cli::provider::{ProviderKind, ProviderSettings, build_adapter};
use xlate_cli::translation::Pipeline;

fn libre_pipeline(server: &MockServer, history: HistoryStore) -> Pipeline {
    let settings = ProviderSettings {
        endpoint: Some(server.url()),
        timeout: Some(Duration::from_secs(5)),
        ..ProviderSettings::default()
    };
    Pipeline::new(build_adapter(ProviderKind::LibreTranslate, &settings).unwrap())
        .with_history(history)
}

#[tokio::test]
async fn test_file_is_translated_chunk_by_chunk() {
    let server = MockServer::start(vec![
        MockResponse::json(200, &json!({"translatedText": "Première phrase."})),
        MockResponse::json(200, &json!({"translatedText": "Deuxième phrase."})),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes.fr.txt");
    std::fs::write(&input, "First sentence. Second sentence.").unwrap();

    let history = HistoryStore::new(dir.path().join("history.json"), 10);
    let pipeline = libre_pipeline(&server, history);
    let translator = FileTranslator::new(&pipeline, 20);

    let mut progress = Vec::new();
    let summary = translator
        .translate_file(&input, &output, "en", "fr", |done, total| {
            progress.push((done, total));
        })
        .await
        .unwrap();

    assert!(summary.success);
    assert_eq!(summary.chunks_total, 2);
    assert_eq!(summary.chunks_completed, 2);
    assert_eq!(progress, vec![(0, 2), (1, 2), (2, 2)]);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Première phrase. Deuxième phrase."
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].json()["q"], "First sentence.");
    assert_eq!(requests[1].json()["q"], "Second sentence.");

    let records = pipeline.history().unwrap().list(10, None);
    assert_eq!(records.len(), 1);
    assert!(records[0].source_text.starts_with("[file] "));
    assert_eq!(records[0].result.target, "fr");
}

#[tokio::test]
async fn test_provider_failure_writes_nothing() {
    let server = MockServer::start(vec![
        MockResponse::json(200, &json!({"translatedText": "Première phrase."})),
        MockResponse::json(429, &json!({"error": "Slowdown"})).with_header("Retry-After", "5"),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes.fr.txt");
    std::fs::write(&input, "First sentence. Second sentence.").unwrap();

    let history = HistoryStore::new(dir.path().join("history.json"), 10);
    let pipeline = libre_pipeline(&server, history);
    let translator = FileTranslator::new(&pipeline, 20);

    let summary = translator
        .translate_file(&input, &output, "en", "fr", |_, _| {})
        .await
        .unwrap();

    assert!(!summary.success);
    assert_eq!(summary.chunks_completed, 1);
    assert!(matches!(
        summary.failure,
        Some(TranslateError::RateLimited {
            retry_after: Some(5),
            ..
        })
    ));
    assert!(!output.exists());
    assert!(pipeline.history().unwrap().is_empty());
}
