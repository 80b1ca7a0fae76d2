//! Default endpoints, limits and locations for the console configuration.
//!
//! # Design
//! - Keep defaults in one place so the loader and docs agree.
//! - Endpoint paths mirror the storefront backend routes.

/// Base URL of the storefront backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
/// Token verification endpoint.
pub const DEFAULT_VERIFY_PATH: &str = "/api/auth/verify";
/// Credential issuing endpoint.
pub const DEFAULT_LOGIN_PATH: &str = "/api/auth/login";
/// Navigation target when a protected view denies access.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
/// Upper bound on a single verification request.
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;
/// Upper bound on dashboard requests.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
/// Accepted range for any configured timeout.
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=120;
/// File name of the credential document.
pub const CREDENTIALS_FILE: &str = "credentials.json";
/// Directory under `$HOME` holding console state.
pub const HOME_SUBDIR: &str = ".config/agrimart";
