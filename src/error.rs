//! Error taxonomy shared by the provider adapters, the pipeline and the CLI.

use thiserror::Error;

/// A translation failure the user can act on.
///
/// `Validation` is always raised locally before any network traffic. Every
/// other variant originates at the provider adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("{0}")]
    Validation(String),

    #[error("{provider} rejected the credentials: {message}")]
    Unauthorized { provider: String, message: String },

    #[error("{provider} is rate limiting requests")]
    RateLimited {
        provider: String,
        retry_after: Option<u64>,
    },

    #[error("{provider} is unreachable: {message}")]
    Unreachable { provider: String, message: String },

    #[error("{provider} returned an unexpected response: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("{provider} refused the request (HTTP {status}): {message}")]
    Rejected {
        provider: String,
        status: u16,
        message: String,
    },
}

impl TranslateError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn malformed(provider: impl ToString, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` for failures caused by bad local input.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// A suggestion for what the user should do next.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Validation(_) => Some(
                "Run 'xlate --help' for usage or 'xlate languages' for language codes.".to_string(),
            ),
            Self::Unauthorized { .. } => Some(
                "Check your API key: set the provider's environment variable \
                 or run 'xlate configure'."
                    .to_string(),
            ),
            Self::RateLimited {
                retry_after: Some(secs),
                ..
            } => Some(format!("Wait {secs}s before trying again.")),
            Self::RateLimited { .. } => {
                Some("Wait a moment before trying again; do not retry immediately.".to_string())
            }
            Self::Unreachable { .. } => {
                Some("Check your network connection or the configured endpoint.".to_string())
            }
            Self::MalformedResponse { .. } | Self::Rejected { .. } => None,
        }
    }
}
