//! Persistent storage for local credentials
//!
//! The local provider keeps its users in a single JSON document, by default
//! `~/.config/hostlink/auth_provider.json`.

use crate::credential::Credential;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Current credential document version
pub const STORAGE_VERSION: u32 = 1;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported credential document version {0}")]
    UnsupportedVersion(u32),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stored data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredData {
    pub version: u32,
    #[serde(default)]
    pub users: Vec<Credential>,
}

impl Default for StoredData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            users: Vec::new(),
        }
    }
}

/// The credential document on disk
pub struct CredentialFile {
    /// Path to the storage file
    path: PathBuf,
    /// Serializes writers so temp files never interleave
    write_lock: Mutex<()>,
}

impl CredentialFile {
    /// Create a handle for the document at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the document.
    ///
    /// A missing file yields an empty store; an unreadable one is an error.
    pub fn load(&self) -> StorageResult<StoredData> {
        if !self.path.exists() {
            debug!("No existing credential storage at {:?}, starting empty", self.path);
            return Ok(StoredData::default());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let data: StoredData = serde_json::from_str(&contents)?;
        if data.version > STORAGE_VERSION {
            return Err(StorageError::UnsupportedVersion(data.version));
        }

        info!("Loaded {} credential(s) from {:?}", data.users.len(), self.path);
        Ok(data)
    }

    /// Write the document atomically (temp file, then rename)
    pub async fn save(&self, data: &StoredData) -> StorageResult<()> {
        self.save_with(|| data.clone()).await
    }

    /// Like [`CredentialFile::save`], but takes the snapshot only once the
    /// write lock is held, so writers land on disk in snapshot order
    pub async fn save_with<F>(&self, snapshot: F) -> StorageResult<()>
    where
        F: FnOnce() -> StoredData,
    {
        let _guard = self.write_lock.lock().await;
        let json = serde_json::to_string_pretty(&snapshot())?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Saved credential storage to {:?}", self.path);
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
