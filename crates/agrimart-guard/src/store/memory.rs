use std::sync::Mutex;

use super::{CredentialStore, StoredCredential};
use crate::error::{StoreError, StoreResult};

/// Process-local credential store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<StoredCredential>,
}

impl MemoryCredentialStore {
    /// Create a store pre-populated with `credential`.
    #[must_use]
    pub const fn with(credential: StoredCredential) -> Self {
        Self {
            slot: Mutex::new(credential),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> StoreResult<StoredCredential> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn set_both(&self, credential: &StoredCredential) -> StoreResult<()> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = credential.clone();
        Ok(())
    }

    fn clear_both(&self) -> StoreResult<()> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = StoredCredential::default();
        Ok(())
    }
}
