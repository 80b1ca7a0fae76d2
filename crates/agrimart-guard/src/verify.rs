//! Token verification against the storefront backend.

use std::time::Duration;

use agrimart_api_models::{UserRecord, VerifyResponse};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::VerifyError;

/// Confirms a bearer token and returns the authoritative identity.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Verify `token` once; implementations must not retry.
    async fn verify(&self, token: &str) -> Result<UserRecord, VerifyError>;
}

#[async_trait]
impl<T: Verifier + ?Sized> Verifier for &T {
    async fn verify(&self, token: &str) -> Result<UserRecord, VerifyError> {
        (**self).verify(token).await
    }
}

#[async_trait]
impl<T: Verifier + ?Sized> Verifier for std::sync::Arc<T> {
    async fn verify(&self, token: &str) -> Result<UserRecord, VerifyError> {
        (**self).verify(token).await
    }
}

/// Resolve an API `path` beneath `base_url`, keeping any path prefix the
/// base carries (`https://host/shop` + `/api/x` gives `https://host/shop/api/x`).
///
/// # Errors
///
/// Returns an error if the joined URL does not parse.
pub fn join_api_path(base_url: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
}

/// [`Verifier`] backed by `GET <api_url><verify_path>`.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    client: Client,
    endpoint: Url,
}

impl HttpVerifier {
    /// Build a verifier for `verify_path` under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &Url, verify_path: &str, timeout: Duration) -> Result<Self, VerifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| VerifyError::Transport { source })?;
        Self::with_client(client, base_url, verify_path)
    }

    /// Build a verifier reusing an existing client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built.
    pub fn with_client(
        client: Client,
        base_url: &Url,
        verify_path: &str,
    ) -> Result<Self, VerifyError> {
        let endpoint = join_api_path(base_url, verify_path)
            .map_err(|source| VerifyError::Endpoint {
                path: verify_path.to_string(),
                source,
            })?;
        Ok(Self { client, endpoint })
    }

    /// Fully resolved verification URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn verify(&self, token: &str) -> Result<UserRecord, VerifyError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "verification endpoint rejected token");
            return Err(VerifyError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(classify_transport)?;
        let envelope: VerifyResponse = serde_json::from_slice(&body)
            .map_err(|source| VerifyError::MalformedResponse { source })?;
        Ok(envelope.user)
    }
}

fn classify_transport(source: reqwest::Error) -> VerifyError {
    if source.is_timeout() {
        VerifyError::Timeout
    } else {
        VerifyError::Transport { source }
    }
}
