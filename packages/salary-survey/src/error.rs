//! Typed errors for the salary survey library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! configuration problem apart from a provider that stopped answering.

use thiserror::Error;

/// Errors that can occur while running a survey.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// Configuration is incomplete or invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A provider request failed while collecting postings for a term
    #[error("{provider} failed for {term:?}: {source}")]
    Provider {
        provider: String,
        term: String,
        #[source]
        source: TransportError,
    },
}

/// Configuration errors, reported before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential was not supplied
    #[error("missing credential: {var} must be set")]
    MissingCredential { var: &'static str },

    /// A configuration value is out of range
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised while fetching a page from a provider.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Provider answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request did not complete within the configured timeout
    #[error("timeout requesting {url}")]
    Timeout { url: String },

    /// Body is not the JSON shape the provider documents
    #[error("malformed response: {reason}")]
    Malformed { reason: String },
}

impl TransportError {
    /// Whether repeating the same GET may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Malformed { .. } => false,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed {
            reason: e.to_string(),
        }
    }
}

/// Result type alias for survey operations.
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;
