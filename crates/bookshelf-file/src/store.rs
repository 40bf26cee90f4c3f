//! JSON-file token store.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use bookshelf_core::Result;
use bookshelf_core::error::{Error, StorageError};
use bookshelf_core::{StoreKey, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk layout of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl StoredSession {
    fn slot(&mut self, key: StoreKey) -> &mut Option<String> {
        match key {
            StoreKey::AccessToken => &mut self.access_token,
            StoreKey::RefreshToken => &mut self.refresh_token,
            StoreKey::Username => &mut self.username,
        }
    }

    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.username.is_none()
    }
}

/// A [`TokenStore`] persisted as a small JSON file.
///
/// Values survive restarts and are shared by every process pointed at the
/// same path. Each operation takes an exclusive lock on a sibling
/// `.lock` file, and writes go through a temporary file that is renamed
/// into place, so readers never observe a half-written session. On Unix
/// the file is created with mode `0600`.
///
/// A missing file is an empty store. Clearing the last key removes the file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn io_error(&self, path: &Path, err: std::io::Error) -> Error {
        StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
        .into()
    }

    /// Run `f` while holding the store's exclusive lock.
    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| self.io_error(&lock_path, e))?;

        lock_file
            .lock_exclusive()
            .map_err(|e| self.io_error(&lock_path, e))?;
        let result = f();
        lock_file
            .unlock()
            .map_err(|e| self.io_error(&lock_path, e))?;
        result
    }

    fn load(&self) -> Result<StoredSession> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredSession::default());
            }
            Err(e) => return Err(self.io_error(&self.path, e)),
        };

        serde_json::from_str(&content).map_err(|e| {
            StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn save(&self, stored: &StoredSession) -> Result<()> {
        if stored.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(&self.path, e)),
            };
        }

        let json = serde_json::to_string_pretty(stored).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let temp_path = self.temp_path();
        let mut file = create_private(&temp_path).map_err(|e| self.io_error(&temp_path, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| self.io_error(&temp_path, e))?;

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(&self.path, e))?;
        trace!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

fn create_private(path: &Path) -> std::io::Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        file.set_permissions(perms)?;
    }

    Ok(file)
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        self.locked(|| Ok(self.load()?.slot(key).take()))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        self.locked(|| {
            let mut stored = self.load()?;
            *stored.slot(key) = Some(value.to_string());
            self.save(&stored)
        })?;
        debug!(key = key.as_str(), "Stored value");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self, keys: &[StoreKey]) -> Result<()> {
        self.locked(|| {
            let mut stored = self.load()?;
            for key in keys {
                *stored.slot(*key) = None;
            }
            self.save(&stored)
        })
    }
}
