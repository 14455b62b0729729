//! Domain errors for the conversion pipeline
//!
//! These are business-level failures, independent of any HTTP client or
//! provider SDK. Upstream failures carry the HTTP-like status code they were
//! observed with so the retry wrapper and the boundary layer can classify
//! them without knowing which provider produced them.

use thiserror::Error;

use crate::conversion::entity::Timing;

/// Coarse classification of a failure by its HTTP-like status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 4xx other than 429: the request itself is at fault, retrying is useless
    Client,
    /// Deterministic server-side failure
    Server,
    /// Rate limit or upstream outage; eligible for retry
    Transient,
}

/// Errors that can occur during a conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The uploaded bytes could not be decoded or re-encoded
    #[error("Failed to prepare image: {0}")]
    Preparation(String),

    /// The normalized image exceeds the upstream submission ceiling
    #[error("Processed image size ({size} bytes) exceeds the {max} byte upstream limit")]
    PreparedImageTooLarge { size: usize, max: usize },

    /// An external API call failed with an HTTP status
    #[error("Upstream API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The retry budget was spent without a usable response
    #[error("Failed to convert image after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        status: u16,
        message: String,
    },

    /// The external API answered with a payload we could not interpret
    #[error("Unexpected upstream response: {0}")]
    UnexpectedResponse(String),
}

impl ConversionError {
    /// Create a preparation error with a message
    pub fn preparation(msg: impl Into<String>) -> Self {
        Self::Preparation(msg.into())
    }

    /// Create an upstream error from an HTTP-like status and message
    pub fn upstream(status: u16, msg: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: msg.into(),
        }
    }

    /// Create an unexpected-response error with a message
    pub fn unexpected_response(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// Wrap the final error of a retry loop, recording how many attempts
    /// were made and preserving the underlying classification.
    pub fn retries_exhausted(attempts: u32, source: ConversionError) -> Self {
        Self::RetriesExhausted {
            attempts,
            status: source.upstream_status().unwrap_or(500),
            message: source.to_string(),
        }
    }

    /// The HTTP status observed on the upstream call, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } | Self::RetriesExhausted { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed
    ///
    /// Rate limits (429) and server errors (>= 500) are transient; every
    /// other failure is deterministic for the same input.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn status_class(&self) -> StatusClass {
        match self {
            Self::Upstream { status, .. } if *status == 429 || *status >= 500 => {
                StatusClass::Transient
            }
            Self::Upstream { status, .. } if (400..500).contains(status) => StatusClass::Client,
            _ => StatusClass::Server,
        }
    }

    /// The status code the API boundary should answer with
    ///
    /// Upstream statuses pass through; everything else is a server-side
    /// failure of this service.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::Preparation(_)
            | Self::PreparedImageTooLarge { .. }
            | Self::RetriesExhausted { .. }
            | Self::UnexpectedResponse(_) => 500,
        }
    }
}

/// A failed conversion with the wall-clock time spent before giving up
///
/// The orchestrator attaches timing to failures as well as successes so the
/// boundary layer can report it either way.
#[derive(Debug)]
pub struct ConversionFailure {
    pub error: ConversionError,
    pub timing: Timing,
}

impl ConversionFailure {
    pub fn new(error: ConversionError, timing: Timing) -> Self {
        Self { error, timing }
    }
}

impl std::fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ConversionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;
