//! VirtualFileSystem trait definition

use crate::error::VfsResult;
use std::path::Path;
use std::time::SystemTime;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name, without any leading path.
    pub name: String,
    /// Whether the entry is itself a directory.
    pub is_dir: bool,
}

/// Virtual File System trait
///
/// Provides a unified interface for file operations, decoupling code from
/// specific file system implementations.
///
/// # Implementations
/// - `MemoryFileSystem`: In-memory file system
/// - `NativeFileSystem`: Native OS file system
pub trait VirtualFileSystem: Send + Sync {
    /// Read file contents as bytes.
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Write file contents.
    ///
    /// Creates the file if it doesn't exist, truncates it if it does.
    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// List the immediate entries of a directory, sorted by name.
    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>>;

    /// Last modification time of a file or directory.
    fn modified(&self, path: &Path) -> VfsResult<SystemTime>;
}
