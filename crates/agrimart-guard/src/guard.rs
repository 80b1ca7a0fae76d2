//! Route access guard state machine.
//!
//! # Design
//! - `Init` snapshots the store once; `Loading` issues at most one
//!   verification bounded by [`GuardSettings::verify_timeout`]; the terminal
//!   state is computed by a pure resolution step.
//! - Clear-both is the only mutation and happens only after the endpoint
//!   rejected the token.
//! - Cancellation is checked before any mutation and before committing the
//!   decision; a cancelled activation yields `None`.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use agrimart_api_models::{Role, UserRecord};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::decision::{AccessDecision, DenyReason};
use crate::error::VerifyError;
use crate::store::{CredentialStore, StoredCredential};
use crate::verify::Verifier;

/// Default bound on a single verification request.
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for a [`RouteGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSettings {
    /// Upper bound on the verification request; expiry counts as unreachable.
    pub verify_timeout: Duration,
    /// Admit the cached identity when the endpoint cannot be reached.
    pub offline_fallback: bool,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
            offline_fallback: true,
        }
    }
}

/// Phase of a single activation, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPhase {
    /// Reading the credential snapshot.
    Init,
    /// Waiting for the verification endpoint.
    Loading,
    /// Terminal: protected view rendered.
    Granted,
    /// Terminal: redirected to login.
    Denied,
}

impl Display for GuardPhase {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Init => "init",
            Self::Loading => "loading",
            Self::Granted => "granted",
            Self::Denied => "denied",
        })
    }
}

/// Decides render-or-redirect for protected views.
#[derive(Debug, Clone)]
pub struct RouteGuard<S, V> {
    store: S,
    verifier: V,
    settings: GuardSettings,
}

#[derive(Debug)]
struct Resolution {
    decision: AccessDecision,
    clear_store: bool,
}

impl Resolution {
    const fn keep(decision: AccessDecision) -> Self {
        Self {
            decision,
            clear_store: false,
        }
    }
}

impl<S, V> RouteGuard<S, V>
where
    S: CredentialStore,
    V: Verifier,
{
    /// Build a guard over `store` and `verifier`.
    pub const fn new(store: S, verifier: V, settings: GuardSettings) -> Self {
        Self {
            store,
            verifier,
            settings,
        }
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &GuardSettings {
        &self.settings
    }

    /// Credential store the guard reads and clears.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run one activation for a view requiring `required` (or any identity).
    ///
    /// Returns `None` when `cancel` fires before the decision is committed;
    /// in that case the store is left untouched.
    pub async fn evaluate(
        &self,
        required: Option<&Role>,
        cancel: &CancelFlag,
    ) -> Option<AccessDecision> {
        if cancel.is_cancelled() {
            return None;
        }
        debug!(phase = %GuardPhase::Init, required = ?required.map(Role::as_str), "guard activation");

        let snapshot = match self.store.get() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "credential store unreadable; treating as absent");
                StoredCredential::default()
            }
        };
        let Some(token) = snapshot
            .token
            .clone()
            .filter(|_| snapshot.is_complete())
        else {
            return Some(commit(AccessDecision::Denied(DenyReason::NoCredential)));
        };

        debug!(phase = %GuardPhase::Loading, "verifying credential");
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("activation cancelled while verifying");
                return None;
            }
            result = timeout(self.settings.verify_timeout, self.verifier.verify(&token)) => {
                result.unwrap_or(Err(VerifyError::Timeout))
            }
        };
        if cancel.is_cancelled() {
            debug!("activation cancelled after verification resolved");
            return None;
        }

        let resolution = resolve(
            outcome,
            &snapshot,
            token,
            required,
            self.settings.offline_fallback,
        );
        if resolution.clear_store {
            if let Err(err) = self.store.clear_both() {
                warn!(error = %err, "failed to clear rejected credential");
            } else {
                debug!("rejected credential cleared");
            }
        }
        Some(commit(resolution.decision))
    }
}

fn commit(decision: AccessDecision) -> AccessDecision {
    match &decision {
        AccessDecision::Granted { user, source, .. } => {
            debug!(
                phase = %GuardPhase::Granted,
                role = %user.role,
                source = ?source,
                "access granted"
            );
        }
        AccessDecision::Denied(reason) => {
            info!(phase = %GuardPhase::Denied, reason = %reason, "access denied");
        }
        AccessDecision::Pending => {}
    }
    decision
}

fn role_satisfied(required: Option<&Role>, user: &UserRecord) -> bool {
    required.is_none_or(|role| *role == user.role)
}

fn resolve(
    outcome: Result<UserRecord, VerifyError>,
    snapshot: &StoredCredential,
    token: String,
    required: Option<&Role>,
    offline_fallback: bool,
) -> Resolution {
    match outcome {
        Ok(user) if role_satisfied(required, &user) => {
            Resolution::keep(AccessDecision::verified(user, token))
        }
        Ok(_) => Resolution::keep(AccessDecision::Denied(DenyReason::InsufficientRole)),
        Err(VerifyError::Rejected { status }) => {
            debug!(status, "verification endpoint rejected credential");
            Resolution {
                decision: AccessDecision::Denied(DenyReason::InvalidCredential),
                clear_store: true,
            }
        }
        Err(VerifyError::MalformedResponse { source }) => {
            debug!(error = %source, "verification body did not match schema");
            Resolution::keep(AccessDecision::Denied(DenyReason::MalformedResponse))
        }
        Err(err) => {
            debug!(error = %err, "verification endpoint unreachable");
            if !offline_fallback {
                return Resolution::keep(AccessDecision::Denied(DenyReason::NetworkUnavailable));
            }
            let decision = match snapshot.cached_user() {
                Some(Ok(user)) if role_satisfied(required, &user) => {
                    AccessDecision::cached(user, token)
                }
                Some(Ok(_)) => AccessDecision::Denied(DenyReason::InsufficientRole),
                Some(Err(_)) | None => AccessDecision::Denied(DenyReason::MalformedCache),
            };
            Resolution::keep(decision)
        }
    }
}
