//! The on-disk module name cache.
//!
//! A JSON array of qualified module names, written wholesale and scoped to
//! one interpreter version per file. Read once at session startup; rebuilt
//! whenever any search-path entry is newer than the cache file.

use replmod_config::VersionInfo;
use replmod_vfs::{VfsError, VirtualFileSystem};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Name cache error
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache '{}': {source}", path.display())]
    Read { path: PathBuf, source: VfsError },

    #[error("failed to write cache '{}': {source}", path.display())]
    Write { path: PathBuf, source: VfsError },

    #[error("cache '{}' is not a valid name list: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

/// Version-scoped, file-backed set of importable module names.
pub struct NameCache {
    vfs: Arc<dyn VirtualFileSystem>,
    path: PathBuf,
}

impl NameCache {
    /// Cache for `version`, stored under `home_dir`.
    pub fn new(vfs: Arc<dyn VirtualFileSystem>, home_dir: &Path, version: &VersionInfo) -> Self {
        Self {
            vfs,
            path: home_dir.join(version.cache_basename()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Is the cached name list possibly out of date?
    ///
    /// True when the cache file cannot be stat'ed at all, or when any
    /// search-path entry was modified after the cache was written.
    /// Entries that cannot be stat'ed are skipped individually.
    pub fn is_stale(&self, search_path: &[PathBuf]) -> bool {
        let cache_mtime = match self.vfs.modified(&self.path) {
            Ok(mtime) => mtime,
            Err(err) => {
                debug!(
                    target: "replmod::cache",
                    path = %self.path.display(),
                    error = %err,
                    "cache file not usable, treating as stale",
                );
                return true;
            }
        };

        let mut newest = None;
        for entry in search_path {
            match self.vfs.modified(entry) {
                Ok(mtime) => {
                    if newest.map_or(true, |n| mtime > n) {
                        newest = Some(mtime);
                    }
                }
                Err(_) => continue,
            }
        }

        newest.map_or(false, |n| n > cache_mtime)
    }

    /// Deserialize the cached name set.
    pub fn load(&self) -> Result<BTreeSet<String>, CacheError> {
        let content = self.vfs.read_file(&self.path).map_err(|e| CacheError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let names: Vec<String> =
            serde_json::from_slice(&content).map_err(|e| CacheError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        Ok(names.into_iter().collect())
    }

    /// Serialize `names` to the cache file, replacing any previous content.
    pub fn store(&self, names: &BTreeSet<String>) -> Result<(), CacheError> {
        let list: Vec<&String> = names.iter().collect();
        let content = serde_json::to_vec(&list).map_err(|e| CacheError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        self.vfs
            .write_file(&self.path, &content)
            .map_err(|e| CacheError::Write {
                path: self.path.clone(),
                source: e,
            })
    }
}
