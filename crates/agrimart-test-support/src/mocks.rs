//! Fake verifiers for guard and CLI suites.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use agrimart_api_models::UserRecord;
use agrimart_guard::{Verifier, VerifyError};
use async_trait::async_trait;

/// Canned response a [`ScriptedVerifier`] returns.
#[derive(Debug, Clone)]
pub enum VerifyScript {
    /// Confirm the token for this identity.
    Grant(UserRecord),
    /// Reject the token with this HTTP status.
    Reject(u16),
    /// Answer 2xx with a body that fails the schema.
    Malformed,
    /// Fail as if the endpoint could not be reached.
    Unreachable,
    /// Never answer.
    Hang,
}

/// [`Verifier`] that replays a script and records the tokens it saw.
#[derive(Debug)]
pub struct ScriptedVerifier {
    script: VerifyScript,
    calls: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl ScriptedVerifier {
    /// Verifier answering every call with `script`.
    #[must_use]
    pub const fn new(script: VerifyScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        }
    }

    /// Number of verification attempts observed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tokens presented so far, oldest first.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.tokens
            .lock()
            .map(|tokens| tokens.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Verifier for ScriptedVerifier {
    async fn verify(&self, token: &str) -> Result<UserRecord, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.push(token.to_string());
        }
        match &self.script {
            VerifyScript::Grant(user) => Ok(user.clone()),
            VerifyScript::Reject(status) => Err(VerifyError::Rejected { status: *status }),
            VerifyScript::Malformed => {
                let source = match serde_json::from_str::<UserRecord>("{}") {
                    Err(source) => source,
                    Ok(user) => return Ok(user),
                };
                Err(VerifyError::MalformedResponse { source })
            }
            VerifyScript::Unreachable => Err(VerifyError::Timeout),
            VerifyScript::Hang => std::future::pending().await,
        }
    }
}
