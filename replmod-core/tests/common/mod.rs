//! Shared helpers for registry integration tests.

use replmod_core::{LazyModuleRegistry, SessionConfig, VersionInfo};
use replmod_vfs::MemoryFileSystem;
use std::path::PathBuf;
use std::sync::Arc;

/// A small module tree resembling a real installation, including one
/// deny-listed module and one module that would shadow a shell builtin.
pub fn library_fs() -> MemoryFileSystem {
    MemoryFileSystem::with_files([
        ("/lib/os.py", b"# OS interface\n".to_vec()),
        ("/lib/json.py", b"# JSON codec\n".to_vec()),
        ("/lib/pkg/__init__.py", b"# a package\n".to_vec()),
        ("/lib/pkg/sub.py", b"# a submodule\n".to_vec()),
        ("/lib/pycurl.py", b"# breaks ^C when imported eagerly\n".to_vec()),
        ("/lib/help.py", b"# shadows the shell builtin\n".to_vec()),
    ])
}

pub fn test_config() -> SessionConfig {
    SessionConfig {
        version: VersionInfo::new(3, 11),
        home_dir: PathBuf::from("/home/user"),
        search_path: vec![PathBuf::from("/lib")],
        builtin_modules: vec![
            "sys".to_string(),
            "builtins".to_string(),
            "__main__".to_string(),
        ],
        ..SessionConfig::default()
    }
}

pub fn registry_on(fs: &MemoryFileSystem) -> LazyModuleRegistry {
    LazyModuleRegistry::new(Arc::new(fs.clone()), test_config())
}
