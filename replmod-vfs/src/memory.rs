//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::{DirEntry, VirtualFileSystem};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

#[derive(Debug, Clone)]
struct FileData {
    content: Vec<u8>,
    modified: SystemTime,
}

/// An in-memory file system implementation.
///
/// All files are stored in memory using a `BTreeMap`, making it suitable
/// for testing and scenarios where disk access is not desired. Directories
/// are implicit: a path is a directory when some file lives below it, or
/// when its modification time has been stamped explicitly with
/// [`MemoryFileSystem::set_modified`].
///
/// # Example
/// ```
/// use replmod_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("/lib/os.py"), b"# os module").unwrap();
/// assert!(fs.is_dir(Path::new("/lib")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, FileData>>>,
    dir_times: Arc<RwLock<BTreeMap<String, SystemTime>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.write_file(Path::new(path.as_ref()), &content)
                .unwrap_or_else(|_| unreachable!("memory write cannot fail on a fresh fs"));
        }
        fs
    }

    /// Stamp the modification time of a file or directory.
    ///
    /// Stamping a path with no files below it makes it an (empty)
    /// directory. Test suites use this to steer staleness decisions.
    pub fn set_modified(&self, path: &Path, time: SystemTime) {
        let normalized = normalize_path(path);
        if let Ok(mut files) = self.files.write() {
            if let Some(data) = files.get_mut(&normalized) {
                data.modified = time;
                return;
            }
        }
        if let Ok(mut dirs) = self.dir_times.write() {
            dirs.insert(normalized, time);
        }
    }

    fn lock_error() -> VfsError {
        VfsError::Custom {
            message: String::from("Lock poisoned"),
        }
    }
}

/// Normalize a path string for internal storage.
/// Uses forward slashes consistently for cross-platform compatibility.
fn normalize_path(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    if s.len() > 1 {
        s.trim_end_matches('/').to_string()
    } else {
        s
    }
}

fn dir_prefix(normalized: &str) -> String {
    if normalized == "/" {
        String::from("/")
    } else {
        format!("{}/", normalized)
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = normalize_path(path);
        let files = self.files.read().map_err(|_| Self::lock_error())?;

        files
            .get(&normalized)
            .map(|data| data.content.clone())
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let normalized = normalize_path(path);
        let mut files = self.files.write().map_err(|_| Self::lock_error())?;
        files.insert(
            normalized,
            FileData {
                content: content.to_vec(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        match self.files.read() {
            Ok(files) => files.contains_key(&normalized),
            Err(_) => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        let prefix = dir_prefix(&normalized);
        if let Ok(files) = self.files.read() {
            if files.keys().any(|k| k.starts_with(&prefix)) {
                return true;
            }
        }
        match self.dir_times.read() {
            Ok(dirs) => {
                dirs.contains_key(&normalized) || dirs.keys().any(|k| k.starts_with(&prefix))
            }
            Err(_) => false,
        }
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        let normalized = normalize_path(path);
        if self.is_file(path) {
            return Err(VfsError::NotADirectory { path: normalized });
        }
        if !self.is_dir(path) {
            return Err(VfsError::NotFound { path: normalized });
        }

        let prefix = dir_prefix(&normalized);
        // name -> is_dir; a directory marking wins over a file of the same name
        let mut children: BTreeMap<String, bool> = BTreeMap::new();

        let files = self.files.read().map_err(|_| Self::lock_error())?;
        for key in files.keys() {
            if let Some(rest) = key.strip_prefix(&prefix) {
                match rest.split_once('/') {
                    Some((first, _)) => {
                        children.insert(first.to_string(), true);
                    }
                    None => {
                        children.entry(rest.to_string()).or_insert(false);
                    }
                }
            }
        }
        let dirs = self.dir_times.read().map_err(|_| Self::lock_error())?;
        for key in dirs.keys() {
            if let Some(rest) = key.strip_prefix(&prefix) {
                let first = rest.split('/').next().unwrap_or(rest);
                if !first.is_empty() {
                    children.insert(first.to_string(), true);
                }
            }
        }

        Ok(children
            .into_iter()
            .map(|(name, is_dir)| DirEntry { name, is_dir })
            .collect())
    }

    fn modified(&self, path: &Path) -> VfsResult<SystemTime> {
        let normalized = normalize_path(path);

        let files = self.files.read().map_err(|_| Self::lock_error())?;
        if let Some(data) = files.get(&normalized) {
            return Ok(data.modified);
        }

        let dirs = self.dir_times.read().map_err(|_| Self::lock_error())?;
        if let Some(time) = dirs.get(&normalized) {
            return Ok(*time);
        }

        // Implicit directory: newest time among everything below it.
        let prefix = dir_prefix(&normalized);
        let newest = files
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(_, data)| data.modified)
            .chain(
                dirs.iter()
                    .filter(|(k, _)| k.starts_with(&prefix))
                    .map(|(_, t)| *t),
            )
            .max();

        newest.ok_or(VfsError::NotFound { path: normalized })
    }
}
