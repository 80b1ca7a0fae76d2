//! Typed console configuration and its on-disk document form.

use std::path::PathBuf;
use std::time::Duration;

use agrimart_telemetry::LogFormat;
use serde::Deserialize;
use url::Url;

/// Fully resolved configuration used by the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the storefront backend.
    pub api_url: Url,
    /// Path of the token verification endpoint.
    pub verify_path: String,
    /// Path of the credential issuing endpoint.
    pub login_path: String,
    /// Navigation target shown when a protected view denies access.
    pub login_route: String,
    /// Upper bound on one verification request.
    pub verify_timeout: Duration,
    /// Upper bound on dashboard requests.
    pub http_timeout: Duration,
    /// Location of the persisted credential document.
    pub credentials_path: PathBuf,
    /// Whether a network failure may fall back to the cached identity.
    pub offline_fallback: bool,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

/// Optional overrides read from a JSON configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    /// Base URL of the storefront backend.
    pub api_url: Option<String>,
    /// Path of the token verification endpoint.
    pub verify_path: Option<String>,
    /// Path of the credential issuing endpoint.
    pub login_path: Option<String>,
    /// Navigation target on denial.
    pub login_route: Option<String>,
    /// Verification timeout in seconds.
    pub verify_timeout_secs: Option<u64>,
    /// Dashboard request timeout in seconds.
    pub http_timeout_secs: Option<u64>,
    /// Location of the credential document.
    pub credentials_path: Option<PathBuf>,
    /// Offline fallback switch.
    pub offline_fallback: Option<bool>,
    /// Default log level.
    pub log_level: Option<String>,
    /// Log output format name.
    pub log_format: Option<String>,
}

/// Overrides supplied on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Base URL of the storefront backend.
    pub api_url: Option<Url>,
    /// Verification timeout in seconds.
    pub verify_timeout_secs: Option<u64>,
    /// Location of the credential document.
    pub credentials_path: Option<PathBuf>,
    /// Offline fallback switch.
    pub offline_fallback: Option<bool>,
}
