//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// Configuration document could not be read.
    #[error("failed to read configuration file")]
    Io {
        /// Path of the configuration document.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Configuration document was not valid JSON or contained unknown fields.
    #[error("failed to parse configuration file")]
    Parse {
        /// Path of the configuration document.
        path: PathBuf,
        /// Source JSON error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason,
            value: Some(value.into()),
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_field_message_names_field_and_reason() {
        let err = ConfigError::invalid("api_url", "must use http or https", "ftp://x");
        assert_eq!(
            err.to_string(),
            "invalid value for 'api_url': must use http or https"
        );
        assert!(matches!(
            err,
            ConfigError::InvalidField { value: Some(ref value), .. } if value == "ftp://x"
        ));
    }

    #[test]
    fn io_error_keeps_source() {
        let err = ConfigError::Io {
            path: PathBuf::from("agrimart.json"),
            source: io::Error::other("denied"),
        };
        assert_eq!(err.to_string(), "failed to read configuration file");
        assert!(err.source().is_some());
    }
}
