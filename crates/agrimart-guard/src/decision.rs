//! Access decisions and deny reasons for guard activations.

use std::fmt::{self, Display, Formatter};

use agrimart_api_models::UserRecord;

/// Why an activation was denied.
///
/// Reasons are diagnostic only; callers redirect to the login view for all
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// No complete credential in the store.
    NoCredential,
    /// The verification endpoint rejected the token.
    InvalidCredential,
    /// The identity is valid but lacks the required role.
    InsufficientRole,
    /// The endpoint was unreachable and offline fallback is disabled.
    NetworkUnavailable,
    /// The endpoint was unreachable and the cached identity did not parse.
    MalformedCache,
    /// The endpoint accepted the token but the body did not match the schema.
    MalformedResponse,
}

impl DenyReason {
    /// Stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoCredential => "no_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::InsufficientRole => "insufficient_role",
            Self::NetworkUnavailable => "network_unavailable",
            Self::MalformedCache => "malformed_cache",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl Display for DenyReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Where a granted identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Confirmed by the verification endpoint.
    Verified,
    /// Last-known identity read from the store while the endpoint was unreachable.
    Cached,
}

/// Outcome of one guard activation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessDecision {
    /// Verification has not resolved yet.
    #[default]
    Pending,
    /// Render the protected view for this identity.
    Granted {
        /// Resolved identity passed to the protected view.
        user: UserRecord,
        /// Whether the identity was verified or taken from the cache.
        source: IdentitySource,
        /// Bearer token from the same snapshot the identity was resolved
        /// against.
        token: String,
    },
    /// Redirect to the login view.
    Denied(DenyReason),
}

impl AccessDecision {
    pub(crate) const fn verified(user: UserRecord, token: String) -> Self {
        Self::Granted {
            user,
            source: IdentitySource::Verified,
            token,
        }
    }

    pub(crate) const fn cached(user: UserRecord, token: String) -> Self {
        Self::Granted {
            user,
            source: IdentitySource::Cached,
            token,
        }
    }

    /// Whether the decision is `Granted` or `Denied`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Identity for a granted decision.
    #[must_use]
    pub const fn user(&self) -> Option<&UserRecord> {
        match self {
            Self::Granted { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Token the granted identity was resolved against.
    #[must_use]
    pub const fn token(&self) -> Option<&str> {
        match self {
            Self::Granted { token, .. } => Some(token.as_str()),
            _ => None,
        }
    }

    /// Reason for a denied decision.
    #[must_use]
    pub const fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Denied(reason) => Some(*reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimart_api_models::Role;

    #[test]
    fn accessors_follow_variant() {
        let user = UserRecord {
            user_id: "1".into(),
            username: "ops".into(),
            role: Role::Admin,
            name: "Ops".into(),
        };
        let granted = AccessDecision::cached(user.clone(), "abc".into());
        assert!(granted.is_terminal());
        assert_eq!(granted.user(), Some(&user));
        assert_eq!(granted.token(), Some("abc"));
        assert_eq!(granted.deny_reason(), None);

        let denied = AccessDecision::Denied(DenyReason::MalformedCache);
        assert_eq!(denied.deny_reason(), Some(DenyReason::MalformedCache));
        assert!(denied.user().is_none());
        assert!(denied.token().is_none());
        assert!(!AccessDecision::default().is_terminal());
    }

    #[test]
    fn reasons_have_snake_case_labels() {
        assert_eq!(DenyReason::NoCredential.to_string(), "no_credential");
        assert_eq!(
            DenyReason::InsufficientRole.as_str(),
            "insufficient_role"
        );
    }
}
