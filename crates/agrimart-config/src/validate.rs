//! Validation helpers and parsing utilities for configuration values.

use std::time::Duration;

use agrimart_telemetry::LogFormat;
use url::Url;

use crate::defaults::TIMEOUT_RANGE_SECS;
use crate::error::{ConfigError, ConfigResult};

pub(crate) fn parse_api_url(value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value.trim())
        .map_err(|_| ConfigError::invalid("api_url", "must be an absolute URL", value))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "api_url",
            "must use http or https",
            value,
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::invalid("api_url", "must be a base URL", value));
    }
    Ok(url)
}

pub(crate) fn validate_route(field: &'static str, value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if !trimmed.starts_with('/') {
        return Err(ConfigError::invalid(field, "must start with '/'", value));
    }
    if trimmed.contains(char::is_whitespace) {
        return Err(ConfigError::invalid(
            field,
            "must not contain whitespace",
            value,
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_timeout(field: &'static str, secs: u64) -> ConfigResult<Duration> {
    if !TIMEOUT_RANGE_SECS.contains(&secs) {
        return Err(ConfigError::invalid(
            field,
            "must be between 1 and 120 seconds",
            secs.to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

pub(crate) fn parse_timeout(field: &'static str, value: &str) -> ConfigResult<Duration> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::invalid(field, "must be an integer", value))?;
    validate_timeout(field, secs)
}

pub(crate) fn parse_bool(field: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(field, "must be a boolean", value)),
    }
}

pub(crate) fn parse_log_format(value: &str) -> ConfigResult<LogFormat> {
    LogFormat::parse(value)
        .ok_or_else(|| ConfigError::invalid("log_format", "must be 'json' or 'pretty'", value))
}

pub(crate) fn validate_log_level(value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid("log_level", "must not be empty", value));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_requires_http_scheme() {
        assert!(parse_api_url("https://shop.example.com").is_ok());
        assert!(parse_api_url(" http://127.0.0.1:5000 ").is_ok());

        let err = parse_api_url("ftp://shop.example.com").expect_err("ftp rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "api_url",
                reason: "must use http or https",
                ..
            }
        ));
        assert!(parse_api_url("not a url").is_err());
        assert!(parse_api_url("mailto:owner@example.com").is_err());
    }

    #[test]
    fn routes_must_be_absolute_paths() {
        assert_eq!(
            validate_route("verify_path", " /api/auth/verify ").expect("route"),
            "/api/auth/verify"
        );
        assert!(validate_route("verify_path", "api/auth/verify").is_err());
        assert!(validate_route("login_route", "/log in").is_err());
    }

    #[test]
    fn timeouts_are_bounded() {
        assert_eq!(
            parse_timeout("verify_timeout_secs", "10").expect("timeout"),
            Duration::from_secs(10)
        );
        assert!(parse_timeout("verify_timeout_secs", "0").is_err());
        assert!(parse_timeout("verify_timeout_secs", "121").is_err());
        assert!(parse_timeout("verify_timeout_secs", "ten").is_err());
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert!(parse_bool("offline_fallback", "on").expect("bool"));
        assert!(!parse_bool("offline_fallback", "FALSE").expect("bool"));
        assert!(parse_bool("offline_fallback", "maybe").is_err());
    }

    #[test]
    fn log_settings_are_checked() {
        assert_eq!(parse_log_format("json").expect("format"), LogFormat::Json);
        assert!(parse_log_format("yaml").is_err());
        assert!(validate_log_level("  ").is_err());
        assert_eq!(validate_log_level("debug").expect("level"), "debug");
    }
}
