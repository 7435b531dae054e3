//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::{DirEntry, VirtualFileSystem};
use std::path::Path;
use std::time::SystemTime;

/// A native OS file system implementation.
///
/// This wraps `std::fs` operations and provides the `VirtualFileSystem`
/// interface for local file access.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self
    }
}

fn map_io_error(err: std::io::Error, path: &Path) -> VfsError {
    match err.kind() {
        std::io::ErrorKind::NotFound => VfsError::NotFound {
            path: path.to_string_lossy().to_string(),
        },
        std::io::ErrorKind::PermissionDenied => VfsError::PermissionDenied {
            path: path.to_string_lossy().to_string(),
        },
        _ => err.into(),
    }
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(e, path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        if path.exists() && !path.is_dir() {
            return Err(VfsError::NotADirectory {
                path: path.to_string_lossy().to_string(),
            });
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| map_io_error(e, path))? {
            let entry = entry.map_err(|e| map_io_error(e, path))?;
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry { name, is_dir });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn modified(&self, path: &Path) -> VfsResult<SystemTime> {
        let meta = std::fs::metadata(path).map_err(|e| map_io_error(e, path))?;
        meta.modified().map_err(|e| map_io_error(e, path))
    }
}
