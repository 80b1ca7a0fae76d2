//! Credential storage shared by login, logout and the route guard.
//!
//! # Design
//! - Two logical keys (`token`, `user`) that are only ever read whole,
//!   written together and cleared together.
//! - The cached identity is kept serialised; parsing it is the guard's job so
//!   a corrupt record never hides the token.

mod file;
mod memory;

use agrimart_api_models::UserRecord;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

/// Storage key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the serialised [`UserRecord`].
pub const USER_KEY: &str = "user";

/// Snapshot of both credential keys as read from a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Opaque bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Serialised cached identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl StoredCredential {
    /// Build a complete credential from a freshly issued token and identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity cannot be serialised.
    pub fn issued(token: impl Into<String>, user: &UserRecord) -> StoreResult<Self> {
        let user = serde_json::to_string(user).map_err(|source| StoreError::Encode { source })?;
        Ok(Self {
            token: Some(token.into()),
            user: Some(user),
        })
    }

    /// Both keys present and the token non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty()) && self.user.is_some()
    }

    /// Whether neither key holds a value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }

    /// Parse the cached identity, if one is stored.
    #[must_use]
    pub fn cached_user(&self) -> Option<Result<UserRecord, serde_json::Error>> {
        self.user.as_deref().map(serde_json::from_str)
    }
}

/// Persistent key-value store for the credential pair.
pub trait CredentialStore: Send + Sync {
    /// Read both keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self) -> StoreResult<StoredCredential>;

    /// Replace both keys at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_both(&self, credential: &StoredCredential) -> StoreResult<()>;

    /// Remove both keys at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be cleared.
    fn clear_both(&self) -> StoreResult<()>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn get(&self) -> StoreResult<StoredCredential> {
        (**self).get()
    }

    fn set_both(&self, credential: &StoredCredential) -> StoreResult<()> {
        (**self).set_both(credential)
    }

    fn clear_both(&self) -> StoreResult<()> {
        (**self).clear_both()
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<T> {
    fn get(&self) -> StoreResult<StoredCredential> {
        (**self).get()
    }

    fn set_both(&self, credential: &StoredCredential) -> StoreResult<()> {
        (**self).set_both(credential)
    }

    fn clear_both(&self) -> StoreResult<()> {
        (**self).clear_both()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimart_api_models::Role;

    fn user() -> UserRecord {
        UserRecord {
            user_id: "u-7".into(),
            username: "kiran".into(),
            role: Role::Admin,
            name: "Kiran".into(),
        }
    }

    #[test]
    fn issued_credential_is_complete_and_parses_back() {
        let credential = StoredCredential::issued("abc", &user()).expect("issue");
        assert!(credential.is_complete());
        let parsed = credential
            .cached_user()
            .expect("user present")
            .expect("user parses");
        assert_eq!(parsed, user());
    }

    #[test]
    fn partial_credentials_are_incomplete() {
        let token_only = StoredCredential {
            token: Some("abc".into()),
            user: None,
        };
        assert!(!token_only.is_complete());
        assert!(token_only.cached_user().is_none());

        let empty_token = StoredCredential {
            token: Some(String::new()),
            user: Some("{}".into()),
        };
        assert!(!empty_token.is_complete());
        assert!(StoredCredential::default().is_empty());
    }

    #[test]
    fn corrupt_cached_user_reports_parse_error() {
        let credential = StoredCredential {
            token: Some("abc".into()),
            user: Some("{not json".into()),
        };
        assert!(credential.is_complete());
        assert!(matches!(credential.cached_user(), Some(Err(_))));
    }
}
