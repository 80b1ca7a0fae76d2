//! Render-or-redirect wrapper for protected views.

use agrimart_api_models::{Role, UserRecord};

use crate::cancel::CancelFlag;
use crate::decision::{AccessDecision, DenyReason};
use crate::guard::RouteGuard;
use crate::store::CredentialStore;
use crate::verify::Verifier;

/// What the caller should do after activating a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome<T> {
    /// The view was rendered for the resolved identity.
    Rendered(T),
    /// Navigate to the login view.
    Redirect {
        /// Login route to navigate to.
        to: String,
        /// Diagnostic reason; never shown to the end user.
        reason: DenyReason,
    },
    /// The activation was cancelled; do nothing.
    Discarded,
}

/// Activate a protected view.
///
/// `content` runs only for a granted decision and receives the resolved
/// identity with the token it was resolved against; a denied decision
/// redirects to `login_route` without invoking it.
pub async fn guard_view<S, V, T, F>(
    guard: &RouteGuard<S, V>,
    required: Option<&Role>,
    login_route: &str,
    cancel: &CancelFlag,
    content: F,
) -> ViewOutcome<T>
where
    S: CredentialStore,
    V: Verifier,
    F: FnOnce(&UserRecord, &str) -> T,
{
    match guard.evaluate(required, cancel).await {
        Some(AccessDecision::Granted { user, token, .. }) => {
            ViewOutcome::Rendered(content(&user, &token))
        }
        Some(AccessDecision::Denied(reason)) => ViewOutcome::Redirect {
            to: login_route.to_string(),
            reason,
        },
        Some(AccessDecision::Pending) | None => ViewOutcome::Discarded,
    }
}
