//! Layered configuration loading: defaults, JSON document, environment, overrides.

use std::fs;
use std::path::{Path, PathBuf};

use agrimart_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};
use tracing::debug;

use crate::defaults::{
    CREDENTIALS_FILE, DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOGIN_PATH,
    DEFAULT_LOGIN_ROUTE, DEFAULT_VERIFY_PATH, DEFAULT_VERIFY_TIMEOUT_SECS, HOME_SUBDIR,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ConfigDocument, ConfigOverrides, ConsoleConfig};
use crate::validate::{
    parse_api_url, parse_bool, parse_log_format, parse_timeout, validate_log_level,
    validate_route, validate_timeout,
};

/// Environment variable naming the configuration document.
pub const ENV_CONFIG: &str = "AGRIMART_CONFIG";
/// Environment variable overriding the backend URL.
pub const ENV_API_URL: &str = "AGRIMART_API_URL";
/// Environment variable overriding the verification timeout.
pub const ENV_VERIFY_TIMEOUT: &str = "AGRIMART_VERIFY_TIMEOUT_SECS";
/// Environment variable overriding the credential document location.
pub const ENV_CREDENTIALS: &str = "AGRIMART_CREDENTIALS";
/// Environment variable toggling the offline fallback.
pub const ENV_OFFLINE_FALLBACK: &str = "AGRIMART_OFFLINE_FALLBACK";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "AGRIMART_LOG_LEVEL";
/// Environment variable overriding the log format.
pub const ENV_LOG_FORMAT: &str = "AGRIMART_LOG_FORMAT";
/// Environment variable naming the console state directory.
pub const ENV_HOME: &str = "AGRIMART_HOME";

/// Load configuration from the process environment.
///
/// `file` wins over `AGRIMART_CONFIG` when both are present.
///
/// # Errors
///
/// Returns an error when the document cannot be read or parsed, or when any
/// layer supplies an invalid value.
pub fn load(file: Option<&Path>, overrides: ConfigOverrides) -> ConfigResult<ConsoleConfig> {
    load_with_env(file, overrides, |key| std::env::var(key).ok())
}

/// Load configuration using `env` as the environment source.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env<F>(
    file: Option<&Path>,
    overrides: ConfigOverrides,
    env: F,
) -> ConfigResult<ConsoleConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let document_path = file
        .map(Path::to_path_buf)
        .or_else(|| env(ENV_CONFIG).map(PathBuf::from));
    let document = match &document_path {
        Some(path) => read_document(path)?,
        None => ConfigDocument::default(),
    };

    let mut config = defaults(&env)?;
    apply_document(&mut config, document)?;
    apply_env(&mut config, &env)?;
    apply_overrides(&mut config, overrides)?;

    debug!(
        api_url = %config.api_url,
        verify_path = %config.verify_path,
        offline_fallback = config.offline_fallback,
        config_file = ?document_path,
        "console configuration resolved"
    );
    Ok(config)
}

fn defaults<F>(env: &F) -> ConfigResult<ConsoleConfig>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(ConsoleConfig {
        api_url: parse_api_url(DEFAULT_API_URL)?,
        verify_path: DEFAULT_VERIFY_PATH.to_string(),
        login_path: DEFAULT_LOGIN_PATH.to_string(),
        login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        verify_timeout: std::time::Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS),
        http_timeout: std::time::Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        credentials_path: default_credentials_path(env),
        offline_fallback: true,
        log_level: DEFAULT_LOG_LEVEL.to_string(),
        log_format: LogFormat::infer(),
    })
}

fn default_credentials_path<F>(env: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(home) = env(ENV_HOME).filter(|value| !value.trim().is_empty()) {
        return PathBuf::from(home).join(CREDENTIALS_FILE);
    }
    env("HOME")
        .filter(|value| !value.trim().is_empty())
        .map_or_else(
            || PathBuf::from(".agrimart").join(CREDENTIALS_FILE),
            |home| PathBuf::from(home).join(HOME_SUBDIR).join(CREDENTIALS_FILE),
        )
}

fn read_document(path: &Path) -> ConfigResult<ConfigDocument> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_document(config: &mut ConsoleConfig, document: ConfigDocument) -> ConfigResult<()> {
    if let Some(url) = document.api_url {
        config.api_url = parse_api_url(&url)?;
    }
    if let Some(path) = document.verify_path {
        config.verify_path = validate_route("verify_path", &path)?;
    }
    if let Some(path) = document.login_path {
        config.login_path = validate_route("login_path", &path)?;
    }
    if let Some(route) = document.login_route {
        config.login_route = validate_route("login_route", &route)?;
    }
    if let Some(secs) = document.verify_timeout_secs {
        config.verify_timeout = validate_timeout("verify_timeout_secs", secs)?;
    }
    if let Some(secs) = document.http_timeout_secs {
        config.http_timeout = validate_timeout("http_timeout_secs", secs)?;
    }
    if let Some(path) = document.credentials_path {
        config.credentials_path = path;
    }
    if let Some(enabled) = document.offline_fallback {
        config.offline_fallback = enabled;
    }
    if let Some(level) = document.log_level {
        config.log_level = validate_log_level(&level)?;
    }
    if let Some(format) = document.log_format {
        config.log_format = parse_log_format(&format)?;
    }
    Ok(())
}

fn apply_env<F>(config: &mut ConsoleConfig, env: &F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_URL) {
        config.api_url = parse_api_url(&url)?;
    }
    if let Some(secs) = env(ENV_VERIFY_TIMEOUT) {
        config.verify_timeout = parse_timeout("verify_timeout_secs", &secs)?;
    }
    if let Some(path) = env(ENV_CREDENTIALS) {
        config.credentials_path = PathBuf::from(path);
    }
    if let Some(enabled) = env(ENV_OFFLINE_FALLBACK) {
        config.offline_fallback = parse_bool("offline_fallback", &enabled)?;
    }
    if let Some(level) = env(ENV_LOG_LEVEL) {
        config.log_level = validate_log_level(&level)?;
    }
    if let Some(format) = env(ENV_LOG_FORMAT) {
        config.log_format = parse_log_format(&format)?;
    }
    Ok(())
}

fn apply_overrides(config: &mut ConsoleConfig, overrides: ConfigOverrides) -> ConfigResult<()> {
    if let Some(url) = overrides.api_url {
        config.api_url = parse_api_url(url.as_str())?;
    }
    if let Some(secs) = overrides.verify_timeout_secs {
        config.verify_timeout = validate_timeout("verify_timeout_secs", secs)?;
    }
    if let Some(path) = overrides.credentials_path {
        config.credentials_path = path;
    }
    if let Some(enabled) = overrides.offline_fallback {
        config.offline_fallback = enabled;
    }
    Ok(())
}
