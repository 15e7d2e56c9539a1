//! HTTP plumbing shared by the adapters: client construction and mapping of
//! transport and status failures onto [`TranslateError`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::ProviderKind;
use crate::error::TranslateError;

/// DeepL reports an exhausted character quota with this status.
const QUOTA_EXCEEDED: u16 = 456;

/// Longest provider error body echoed back to the user.
const MAX_ERROR_BODY: usize = 300;

pub fn build_client(kind: ProviderKind, timeout: Duration) -> Result<Client, TranslateError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("xlate/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TranslateError::Unreachable {
            provider: kind.to_string(),
            message: format!("failed to build HTTP client: {e}"),
        })
}

/// Sends a request and decodes a JSON body, mapping every failure mode.
pub async fn send_json(kind: ProviderKind, request: RequestBuilder) -> Result<Value, TranslateError> {
    let response = request.send().await.map_err(|e| transport_error(kind, &e))?;
    let response = check_status(kind, response).await?;
    response
        .json::<Value>()
        .await
        .map_err(|e| TranslateError::malformed(kind, format!("body is not valid JSON: {e}")))
}

fn transport_error(kind: ProviderKind, err: &reqwest::Error) -> TranslateError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        err.to_string()
    };
    TranslateError::Unreachable {
        provider: kind.to_string(),
        message,
    }
}

async fn check_status(kind: ProviderKind, response: Response) -> Result<Response, TranslateError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    debug!(provider = %kind, status = status.as_u16(), "provider returned an error status");

    Err(status_error(kind, status, retry_after, &body))
}

pub fn status_error(
    kind: ProviderKind,
    status: StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> TranslateError {
    let provider = kind.to_string();
    let message = error_message(body, status);

    match status.as_u16() {
        401 | 403 => TranslateError::Unauthorized { provider, message },
        429 | QUOTA_EXCEEDED => TranslateError::RateLimited {
            provider,
            retry_after,
        },
        code if status.is_server_error() => TranslateError::Unreachable {
            provider,
            message: format!("service error (HTTP {code}): {message}"),
        },
        code => TranslateError::Rejected {
            provider,
            status: code,
            message,
        },
    }
}

/// Pulls a readable message out of an error body, which providers shape differently.
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        [
            "/error/message",
            "/message",
            "/error",
            "/detail",
        ]
        .iter()
        .find_map(|pointer| json.pointer(pointer).and_then(Value::as_str).map(str::to_string))
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    if message.chars().count() > MAX_ERROR_BODY {
        let truncated: String = message.chars().take(MAX_ERROR_BODY).collect();
        return format!("{truncated}...");
    }
    message
}
