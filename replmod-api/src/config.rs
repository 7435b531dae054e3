//! API layer configuration
//!
//! Environment detection for `SessionConfig` and a global singleton
//! (for CLI use). Library users should pass a config explicitly.

use once_cell::sync::OnceCell;
use replmod_config::{SessionConfig, VersionInfo};
use std::path::PathBuf;

/// Environment variable holding the module search path, colon separated.
pub const PATH_ENV: &str = "REPLMOD_PATH";

/// Environment variable holding the interpreter version, e.g. "3.11".
pub const VERSION_ENV: &str = "REPLMOD_VERSION";

/// Built-in module names assumed present when the environment does not
/// say otherwise. The entry point is filtered out during discovery.
pub const DEFAULT_BUILTINS: &[&str] = &[
    "builtins",
    "errno",
    "gc",
    "itertools",
    "marshal",
    "posix",
    "sys",
    "time",
    "__main__",
];

/// Parse a "major.minor" version string.
pub fn parse_version(text: &str) -> Option<VersionInfo> {
    let (major, minor) = text.split_once('.')?;
    Some(VersionInfo::new(
        major.parse().ok()?,
        minor.parse().ok()?,
    ))
}

/// Build a `SessionConfig` from the process environment.
///
/// Missing variables fall back to the defaults: version 3.11, home from
/// `$HOME` (or "."), and an empty search path.
pub fn detect() -> SessionConfig {
    let version = std::env::var(VERSION_ENV)
        .ok()
        .and_then(|v| parse_version(&v))
        .unwrap_or_else(|| VersionInfo::new(3, 11));

    let home_dir = std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    let search_path = std::env::var(PATH_ENV)
        .map(|raw| {
            raw.split(':')
                .filter(|part| !part.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default();

    SessionConfig {
        version,
        home_dir,
        search_path,
        builtin_modules: DEFAULT_BUILTINS.iter().map(|s| s.to_string()).collect(),
        ..SessionConfig::default()
    }
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<SessionConfig> = OnceCell::new();

/// Initialize global configuration (must be called once before any operation)
///
/// # Panics
/// If config is already initialized
pub fn init(config: SessionConfig) {
    GLOBAL_CONFIG
        .set(config)
        .expect("Config already initialized");
}

/// Get global config reference
///
/// # Panics
/// If config is not initialized
pub fn config() -> &'static SessionConfig {
    GLOBAL_CONFIG.get().expect("Config not initialized")
}

/// Check if config is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
