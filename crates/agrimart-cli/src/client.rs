//! Shared client utilities, error types, and route guard wiring for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use agrimart_api_models::{ApiErrorBody, Role, UserRecord};
use agrimart_config::{ConfigError, ConsoleConfig};
use agrimart_guard::{
    CancelFlag, CredentialStore, DenyReason, FileCredentialStore, GuardSettings, HttpVerifier,
    RouteGuard, Verifier, ViewOutcome, guard_view, join_api_path,
};
use agrimart_telemetry::record_role;
use anyhow::anyhow;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::info;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type separating bad input, operational failures and
/// guard denials.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    AccessDenied {
        login_route: String,
        reason: DenyReason,
    },
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::AccessDenied { .. } => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
            Self::AccessDenied { login_route, .. } => {
                format!("authentication required; redirecting to {login_route}")
            }
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField { .. } => Self::validation(err.to_string()),
            other => Self::failure(anyhow::Error::new(other)),
        }
    }
}

/// Identity admitted by the route guard plus the bearer token to act with.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) token: String,
    pub(crate) user: UserRecord,
}

impl Session {
    pub(crate) fn bearer(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) login_path: String,
    pub(crate) login_route: String,
    pub(crate) store: Arc<dyn CredentialStore>,
    pub(crate) verifier: Arc<dyn Verifier>,
    pub(crate) guard: GuardSettings,
}

impl AppContext {
    /// Build the HTTP clients, credential store and verifier from configuration.
    pub(crate) fn from_config(config: &ConsoleConfig, request_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(request_id).map_err(|_| {
            CliError::failure(anyhow!("request identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(config.http_timeout)
            .default_headers(default_headers.clone())
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        let verify_client = Client::builder()
            .timeout(config.verify_timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        let verifier =
            HttpVerifier::with_client(verify_client, &config.api_url, &config.verify_path)
                .map_err(|err| CliError::failure(anyhow!("invalid verification endpoint: {err}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            login_path: config.login_path.clone(),
            login_route: config.login_route.clone(),
            store: Arc::new(FileCredentialStore::new(&config.credentials_path)),
            verifier: Arc::new(verifier),
            guard: GuardSettings {
                verify_timeout: config.verify_timeout,
                offline_fallback: config.offline_fallback,
            },
        })
    }

    /// Resolve `path` against the API base URL.
    pub(crate) fn endpoint(&self, path: &str) -> CliResult<Url> {
        join_api_path(&self.base_url, path)
            .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))
    }

    /// Activate the route guard for a protected command.
    ///
    /// Ctrl-C while the guard is verifying discards the activation.
    pub(crate) async fn authorize(&self, required: Option<&Role>) -> CliResult<Session> {
        let guard = RouteGuard::new(
            Arc::clone(&self.store),
            Arc::clone(&self.verifier),
            self.guard,
        );
        let cancel = CancelFlag::new();
        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };
        let outcome = guard_view(
            &guard,
            required,
            &self.login_route,
            &cancel,
            |user, token| Session {
                token: token.to_string(),
                user: user.clone(),
            },
        )
        .await;
        interrupt.abort();

        match outcome {
            ViewOutcome::Rendered(session) => {
                record_role(session.user.role.as_str());
                Ok(session)
            }
            ViewOutcome::Redirect { to, reason } => {
                info!(reason = %reason, login_route = %to, "protected command denied");
                Err(CliError::AccessDenied {
                    login_route: to,
                    reason,
                })
            }
            ViewOutcome::Discarded => Err(CliError::failure(anyhow!(
                "interrupted before access was decided"
            ))),
        }
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Validate a resource identifier before it is placed in a URL path.
pub(crate) fn path_id(id: &str) -> CliResult<&str> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(CliError::validation(format!("invalid identifier '{id}'")));
    }
    Ok(id)
}

/// Send a request, mapping transport failures to a CLI failure naming `label`.
pub(crate) async fn send(request: RequestBuilder, label: &str) -> CliResult<Response> {
    request
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to {label} failed: {err}")))
}

/// Classify an HTTP response into a CLI error.
pub(crate) async fn classify_problem(response: Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();
    let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(body_text);

    if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        if message.is_empty() {
            CliError::validation(format!("request rejected with status {status}"))
        } else {
            CliError::validation(message)
        }
    } else if message.is_empty() {
        CliError::failure(anyhow!("request failed with status {status}"))
    } else {
        CliError::failure(anyhow!("{message} (status {status})"))
    }
}

#[cfg(test)]
pub(crate) fn test_context(
    base_url: &str,
    store: Arc<dyn CredentialStore>,
    verifier: Arc<dyn Verifier>,
) -> AppContext {
    AppContext {
        client: Client::new(),
        base_url: base_url.parse().expect("valid URL"),
        login_path: "/api/auth/login".to_string(),
        login_route: "/login".to_string(),
        store,
        verifier,
        guard: GuardSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimart_guard::{MemoryCredentialStore, StoreResult, StoredCredential};
    use agrimart_test_support::fixtures::{issued_credential, sample_user};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use agrimart_test_support::mocks::{ScriptedVerifier, VerifyScript};
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn exit_codes_separate_error_kinds() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
        let denied = CliError::AccessDenied {
            login_route: "/login".into(),
            reason: DenyReason::InvalidCredential,
        };
        assert_eq!(denied.exit_code(), 4);
        assert_eq!(
            denied.display_message(),
            "authentication required; redirecting to /login"
        );
    }

    #[test]
    fn endpoints_stay_under_api_prefix() {
        let ctx = test_context(
            "http://127.0.0.1:5000/shop",
            Arc::new(MemoryCredentialStore::default()),
            Arc::new(ScriptedVerifier::new(VerifyScript::Unreachable)),
        );
        assert_eq!(
            ctx.endpoint("/api/orders/o-1/status").expect("url").as_str(),
            "http://127.0.0.1:5000/shop/api/orders/o-1/status"
        );
    }

    #[test]
    fn path_id_rejects_separators() {
        assert_eq!(path_id(" 65f1c2 ").expect("valid"), "65f1c2");
        assert!(path_id("").is_err());
        assert!(path_id("a/b").is_err());
        assert!(path_id("a?b").is_err());
    }

    #[test]
    fn config_field_errors_are_validation() {
        let err = CliError::from(ConfigError::InvalidField {
            field: "api_url",
            reason: "must use http or https",
            value: None,
        });
        assert!(matches!(err, CliError::Validation(ref message) if message.contains("api_url")));
    }

    #[tokio::test]
    async fn classify_problem_uses_message_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/products");
            then.status(422).json_body(json!({"message": "price is required"}));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/api/products/p-1");
            then.status(500).body("");
        });

        let client = Client::new();
        let response = client
            .post(format!("{}/api/products", server.base_url()))
            .send()
            .await
            .expect("response");
        let err = classify_problem(response).await;
        assert!(matches!(err, CliError::Validation(ref message) if message == "price is required"));

        let response = client
            .delete(format!("{}/api/products/p-1", server.base_url()))
            .send()
            .await
            .expect("response");
        let err = classify_problem(response).await;
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("500"));
    }

    #[tokio::test]
    async fn authorize_returns_token_for_granted_identity() {
        let admin = sample_user(Role::Admin);
        let store = Arc::new(MemoryCredentialStore::with(
            issued_credential("abc", &admin).expect("credential"),
        ));
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Grant(admin.clone())));
        let ctx = test_context("http://127.0.0.1:5000", store, verifier);

        let session = ctx.authorize(Some(&Role::Admin)).await.expect("granted");
        assert_eq!(session.token, "abc");
        assert_eq!(session.user, admin);
    }

    /// Store whose contents change after the first read, as when another
    /// process signs in mid-activation.
    struct SwappingStore {
        first: StoredCredential,
        later: StoredCredential,
        reads: AtomicUsize,
    }

    impl CredentialStore for SwappingStore {
        fn get(&self) -> StoreResult<StoredCredential> {
            if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(self.first.clone())
            } else {
                Ok(self.later.clone())
            }
        }

        fn set_both(&self, _credential: &StoredCredential) -> StoreResult<()> {
            Ok(())
        }

        fn clear_both(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn authorize_pairs_identity_with_the_verified_token() {
        let admin = sample_user(Role::Admin);
        let store = Arc::new(SwappingStore {
            first: issued_credential("admin-token", &admin).expect("credential"),
            later: issued_credential("designer-token", &sample_user(Role::Designer))
                .expect("credential"),
            reads: AtomicUsize::new(0),
        });
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Grant(admin.clone())));
        let ctx = test_context("http://127.0.0.1:5000", store, verifier.clone());

        let session = ctx.authorize(Some(&Role::Admin)).await.expect("granted");
        assert_eq!(verifier.tokens(), vec!["admin-token".to_string()]);
        assert_eq!(session.token, "admin-token");
        assert_eq!(session.user, admin);
    }

    #[tokio::test]
    async fn authorize_maps_denial_to_login_redirect() {
        let store = Arc::new(MemoryCredentialStore::with(
            issued_credential("abc", &sample_user(Role::Designer)).expect("credential"),
        ));
        let verifier = Arc::new(ScriptedVerifier::new(VerifyScript::Grant(sample_user(
            Role::Designer,
        ))));
        let ctx = test_context("http://127.0.0.1:5000", store.clone(), verifier);

        let err = ctx
            .authorize(Some(&Role::Admin))
            .await
            .expect_err("denied");
        assert!(matches!(
            err,
            CliError::AccessDenied {
                reason: DenyReason::InsufficientRole,
                ref login_route,
            } if login_route == "/login"
        ));
        assert!(store.get().expect("snapshot").is_complete());
    }
}
