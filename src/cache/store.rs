//! JSON file store for the status record.
//!
//! There is no locking: overlapping writers race and the last write wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CacheError;

use super::record::StatusCache;

/// File-backed store for a single [`StatusCache`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. A missing or empty file yields `None`.
    pub async fn load(&self) -> Result<Option<StatusCache>, CacheError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file");
                return Ok(None);
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!(path = %self.path.display(), "cache file is empty");
            return Ok(None);
        }

        let record = serde_json::from_slice(&bytes).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(record))
    }

    /// Overwrite the file with `record`, creating the parent directory if needed.
    pub async fn save(&self, record: &StatusCache) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CacheError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let bytes = serde_json::to_vec(record).map_err(CacheError::Serialize)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| CacheError::Io {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), expires = %record.expires, "cache saved");
        Ok(())
    }
}
