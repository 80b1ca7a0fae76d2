use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use super::{CredentialStore, StoredCredential};
use crate::error::{StoreError, StoreResult};

/// Credential store persisted as one JSON document on disk.
///
/// Writes go through a uniquely named sibling temp file (owner-only on unix)
/// that is renamed over the document, so readers never see a half-written
/// pair and concurrent writers never share a staging file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store backed by the document at `path`; the file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the credential document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn io_error(&self, operation: &'static str) -> impl FnOnce(io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> StoreResult<StoredCredential> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(StoredCredential::default());
            }
            Err(err) => return Err(self.io_error("read")(err)),
        };
        serde_json::from_slice(&raw).map_err(|source| StoreError::Json {
            operation: "read",
            path: self.path.clone(),
            source,
        })
    }

    fn set_both(&self, credential: &StoredCredential) -> StoreResult<()> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent).map_err(self.io_error("create_dir"))?;
        let body = serde_json::to_vec_pretty(credential).map_err(|source| StoreError::Json {
            operation: "write",
            path: self.path.clone(),
            source,
        })?;

        let mut staging = Builder::new()
            .prefix(".credentials")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(self.io_error("open"))?;
        staging.write_all(&body).map_err(self.io_error("write"))?;
        staging
            .as_file()
            .sync_all()
            .map_err(self.io_error("sync"))?;
        staging
            .persist(&self.path)
            .map_err(|err| self.io_error("rename")(err.error))?;
        debug!(path = %self.path.display(), "credential document written");
        Ok(())
    }

    fn clear_both(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential document removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove")(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> StoredCredential {
        StoredCredential {
            token: Some("abc".into()),
            user: Some(r#"{"userId":"1","username":"a","role":"admin","name":"A"}"#.into()),
        }
    }

    #[test]
    fn missing_document_reads_as_empty() -> StoreResult<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        assert!(store.get()?.is_empty());
        store.clear_both()?;
        Ok(())
    }

    #[test]
    fn write_then_read_returns_same_pair() -> StoreResult<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("nested").join("credentials.json"));
        store.set_both(&complete())?;
        assert_eq!(store.get()?, complete());
        assert_eq!(entries(&dir.path().join("nested")), ["credentials.json"]);

        store.clear_both()?;
        assert!(!store.path().exists());
        assert!(store.get()?.is_empty());
        Ok(())
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn concurrent_writers_leave_one_whole_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("credentials.json");
        let pairs: Vec<StoredCredential> = (0..8)
            .map(|n| StoredCredential {
                token: Some(format!("token-{n}")),
                ..complete()
            })
            .collect();

        std::thread::scope(|scope| {
            for pair in &pairs {
                let store = FileCredentialStore::new(&path);
                scope.spawn(move || {
                    for _ in 0..20 {
                        store.set_both(pair).expect("write");
                    }
                });
            }
        });

        let stored = FileCredentialStore::new(&path).get().expect("whole document");
        assert!(pairs.contains(&stored));
        assert_eq!(entries(dir.path()), ["credentials.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn document_is_private_to_owner() -> StoreResult<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.set_both(&complete())?;
        let mode = fs::metadata(store.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn corrupt_document_is_a_json_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("credentials.json");
        fs::write(&path, b"token=abc").expect("seed file");
        let store = FileCredentialStore::new(path);
        assert!(matches!(store.get(), Err(StoreError::Json { .. })));
    }
}
