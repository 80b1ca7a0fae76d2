//! # Design
//!
//! - Constant-message errors; context lives in structured fields.
//! - Store and verifier failures stay separate so the guard can map each to a
//!   deny reason without inspecting messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by credential stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO failures while touching the credential document.
    #[error("credential store io failure")]
    Io {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Path of the credential document.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The credential document was not valid JSON.
    #[error("credential store json failure")]
    Json {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Path of the credential document.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The identity could not be serialised for storage.
    #[error("credential store encode failure")]
    Encode {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A previous writer panicked while holding the in-memory store.
    #[error("credential store lock poisoned")]
    Poisoned,
}

/// Errors produced while verifying a token against the backend.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The endpoint answered with a non-success status; the token is invalid.
    #[error("verification rejected")]
    Rejected {
        /// HTTP status returned by the endpoint.
        status: u16,
    },
    /// The endpoint answered with success but the body did not match the schema.
    #[error("verification response malformed")]
    MalformedResponse {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The request could not complete.
    #[error("verification request failed")]
    Transport {
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The request did not complete within the configured bound.
    #[error("verification timed out")]
    Timeout,
    /// The verification URL could not be built.
    #[error("verification endpoint invalid")]
    Endpoint {
        /// Offending path.
        path: String,
        /// Underlying URL error.
        source: url::ParseError,
    },
}

impl VerifyError {
    /// Whether the failure means the backend could not be reached.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout)
    }
}
