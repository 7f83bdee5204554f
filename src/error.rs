// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Fetch and parse failures abort the pass they occur in; image failures
//! are recorded and skipped by the materializer and never reach this type's
//! callers as errors.

use std::fmt;
use thiserror::Error;

/// MediaWiki API error codes as a typed vocabulary.
///
/// The API reports failures as `<error code="..." info="..."/>` inside an
/// otherwise successful response. Matching on the typed code keeps the
/// stringly-typed dispatch in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiErrorCode {
    /// Replication lag on the server exceeded the client's tolerance
    MaxLag,
    /// Too many requests from this client
    RateLimited,
    /// The wiki is temporarily read-only or in maintenance
    ReadOnly,
    /// A title in the request is not a valid page title
    InvalidTitle,
    /// Too many values were supplied for a multi-value parameter
    TooManyValues,
    /// Request parameters failed the API's validation
    BadValue,
    /// Server-side exception
    InternalError,
    /// HTTP status code fallback when no API error element is present
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl WikiErrorCode {
    /// Parse a MediaWiki error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "maxlag" => Self::MaxLag,
            "ratelimited" => Self::RateLimited,
            "readonly" => Self::ReadOnly,
            "invalidtitle" => Self::InvalidTitle,
            "toomanyvalues" => Self::TooManyValues,
            "badvalue" | "baddatatype" | "missingparam" => Self::BadValue,
            c if c.starts_with("internal_api_error") => Self::InternalError,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether a later run would plausibly succeed.
    ///
    /// Nothing is retried within a run; this only shapes the log hint.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::MaxLag | Self::RateLimited | Self::ReadOnly | Self::InternalError => true,
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for WikiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxLag => write!(f, "maxlag"),
            Self::RateLimited => write!(f, "ratelimited"),
            Self::ReadOnly => write!(f, "readonly"),
            Self::InvalidTitle => write!(f, "invalidtitle"),
            Self::TooManyValues => write!(f, "toomanyvalues"),
            Self::BadValue => write!(f, "badvalue"),
            Self::InternalError => write!(f, "internal_api_error"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Request to {url} timed out after {timeout_secs}s")]
    RequestTimeout { url: String, timeout_secs: u64 },

    #[error("Wiki service returned {code} for {url}")]
    ServiceStatus {
        code: WikiErrorCode,
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Wiki API returned an error ({code}): {info}")]
    ApiError { code: WikiErrorCode, info: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Continuation token '{token}' was returned twice for the same query")]
    ContinuationLoop { token: String },

    #[error("Enrichment left no {attribute} value for '{title}'")]
    IncompleteEnrichment {
        attribute: &'static str,
        title: String,
    },

    #[error("Image download failed for {url}: {reason}")]
    ImageFetchFailed { url: String, reason: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether rerunning the harvest later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::NetworkFailure(_) | AppError::RequestTimeout { .. } => true,
            AppError::ServiceStatus { code, .. } | AppError::ApiError { code, .. } => {
                code.is_retryable()
            }
            _ => false,
        }
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::MalformedResponse(format!("invalid XML: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for AppError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        AppError::MalformedResponse(format!("invalid XML attribute: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError {
            message: "Failed to encode value as JSON".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
