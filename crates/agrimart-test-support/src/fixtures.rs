//! Identity and credential fixtures.

use agrimart_api_models::{Role, UserRecord};
use agrimart_guard::{CredentialStore, FileCredentialStore, StoredCredential};
use anyhow::{Context, Result};
use tempfile::TempDir;

/// Identity with a display name derived from `role`.
#[must_use]
pub fn sample_user(role: Role) -> UserRecord {
    let label = role.as_str().to_string();
    UserRecord {
        user_id: format!("user-{label}"),
        username: label.clone(),
        name: format!("Sample {label}"),
        role,
    }
}

/// Credential pair as written by a successful login.
///
/// # Errors
///
/// Returns an error if the identity cannot be serialised.
pub fn issued_credential(token: &str, user: &UserRecord) -> Result<StoredCredential> {
    StoredCredential::issued(token, user).context("failed to serialise fixture identity")
}

/// File-backed store in a fresh temp directory, seeded with `credential`.
///
/// The returned [`TempDir`] must outlive the store.
///
/// # Errors
///
/// Returns an error if the temp directory or credential document cannot be
/// created.
pub fn seeded_file_store(credential: &StoredCredential) -> Result<(TempDir, FileCredentialStore)> {
    let dir = tempfile::tempdir().context("failed to create temp directory")?;
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    if !credential.is_empty() {
        store
            .set_both(credential)
            .context("failed to seed credential document")?;
    }
    Ok((dir, store))
}
