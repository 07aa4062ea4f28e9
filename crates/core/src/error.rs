//! Error types for the Agen RP domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Failures from external services keep their own bounded-context enum and
//! can be classified into a [`FailureKind`] for user-facing reporting.

use thiserror::Error;

/// The top-level error type for all Agen RP operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Document / attachment errors ---
    #[error("Unsupported document type '{mime_type}' for {name}")]
    UnsupportedDocumentType { name: String, mime_type: String },

    #[error("Malformed attachment: {0}")]
    MalformedAttachment(String),

    // --- Credentials ---
    #[error("No API key available")]
    MissingCredential,

    #[error("Message must contain text or an image")]
    EmptyMessage,

    // --- External services ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Best-effort classification of an external-service failure.
    ///
    /// Returns `None` for errors raised locally (bad documents, missing
    /// credentials, configuration).
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Provider(e) => Some(e.failure_kind()),
            Self::Storage(e) => Some(e.failure_kind()),
            _ => None,
        }
    }
}

/// Classification of a failed external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The credential was rejected, expired, or revoked (HTTP 401/403).
    AuthRejected,
    /// Usage quota exhausted or rate limited (HTTP 429).
    QuotaExceeded,
    /// The service refused the payload (HTTP 400).
    BadRequest,
    Unknown,
}

impl FailureKind {
    /// Classify from an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::AuthRejected,
            429 => Self::QuotaExceeded,
            400 => Self::BadRequest,
            _ => Self::Unknown,
        }
    }

    /// Classify from a free-form error message by looking for status codes.
    ///
    /// `403` is checked before `429`, and `429` before `400`.
    pub fn from_message(message: &str) -> Self {
        if message.contains("403") {
            Self::AuthRejected
        } else if message.contains("429") {
            Self::QuotaExceeded
        } else if message.contains("400") {
            Self::BadRequest
        } else {
            Self::Unknown
        }
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::AuthenticationFailed(_) => FailureKind::AuthRejected,
            Self::RateLimited(_) => FailureKind::QuotaExceeded,
            Self::ApiError {
                status_code,
                message,
            } => match FailureKind::from_status(*status_code) {
                FailureKind::Unknown => FailureKind::from_message(message),
                kind => kind,
            },
            Self::NotConfigured(m) | Self::Network(m) | Self::InvalidResponse(m) => {
                FailureKind::from_message(m)
            }
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage backend not configured: {0}")]
    NotConfigured(String),

    #[error("Upload of {path} failed: {message} (status: {status_code})")]
    UploadFailed {
        path: String,
        status_code: u16,
        message: String,
    },

    #[error("Query failed: {message} (status: {status_code})")]
    QueryFailed { status_code: u16, message: String },

    #[error("Download of {url} failed: {message}")]
    DownloadFailed { url: String, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl StorageError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::UploadFailed { status_code, .. } | Self::QueryFailed { status_code, .. } => {
                FailureKind::from_status(*status_code)
            }
            Self::NotConfigured(_) => FailureKind::Unknown,
            Self::DownloadFailed { message, .. } | Self::Network(message) => {
                FailureKind::from_message(message)
            }
        }
    }
}
