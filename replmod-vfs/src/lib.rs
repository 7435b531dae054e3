//! replmod Virtual File System
//!
//! A virtual file system abstraction with multiple backend implementations.
//! Discovery and cache staleness checks run entirely through this seam, so
//! suites can simulate search paths, cache files, and modification times
//! without touching disk.
//!
//! # Usage
//! ```rust,ignore
//! use replmod_vfs::{VirtualFileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.write_file(Path::new("/lib/os.py"), b"# os").unwrap();
//! let entries = fs.read_dir(Path::new("/lib")).unwrap();
//! ```

mod error;
mod memory;
mod native;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use r#trait::{DirEntry, VirtualFileSystem};

/// Create a new memory-based file system.
pub fn memory_fs() -> MemoryFileSystem {
    MemoryFileSystem::new()
}

/// Create a new native file system.
pub fn native_fs() -> NativeFileSystem {
    NativeFileSystem::new()
}
