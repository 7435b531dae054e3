//! replmod Config - Pure configuration data structures
//!
//! This crate contains only data structures and constants, no logic or
//! global state. It serves as the shared configuration vocabulary across
//! all replmod crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Module names excluded from eager discovery.
///
/// Importing these during a background walk is known to corrupt
/// interrupt-signal handling or crash the process outright. They never
/// enter the discovered name set, but remain loadable on explicit request.
pub const DENY_LIST: &[&str] = &[
    "ptyprocess",        // Breaks ^C
    "pyatspi",           // Breaks ^C
    "pycurl",            // Breaks ^C
    "xpra.x11.bindings", // Causes segmentation fault
];

/// Names that must never be shadowed by a lazy proxy because the shell
/// itself binds them.
pub const RESERVED_NAMES: &[&str] = &["help"];

/// The entry-point pseudo-module. Always excluded from the builtin list
/// added during discovery.
pub const MAIN_MODULE: &str = "__main__";

/// Interpreter version, used to scope the name cache file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
}

impl VersionInfo {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Basename of the name cache file for this interpreter version.
    ///
    /// Each $MAJOR.$MINOR version has its own cache file.
    pub fn cache_basename(&self) -> String {
        format!(".python{}.{}-repl-modules.cache", self.major, self.minor)
    }
}

/// On-disk layout of an importable module tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
    /// File extension of a module source file, without the dot.
    pub extension: String,
    /// File that marks a directory as an importable package.
    pub package_marker: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            extension: String::from("py"),
            package_marker: String::from("__init__.py"),
        }
    }
}

/// Everything a session needs to discover, cache, and load modules.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interpreter version the cache is keyed by.
    pub version: VersionInfo,
    /// Directory holding the name cache file.
    pub home_dir: PathBuf,
    /// Import search path, scanned in order.
    pub search_path: Vec<PathBuf>,
    /// Module tree layout.
    pub layout: SourceLayout,
    /// Interpreter built-in module names, importable without a source file.
    pub builtin_modules: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: VersionInfo::new(3, 11),
            home_dir: PathBuf::from("."),
            search_path: Vec::new(),
            layout: SourceLayout::default(),
            builtin_modules: Vec::new(),
        }
    }
}

/// Execution phase enum for phase-specific log targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Discovery,
    Cache,
    Registry,
    Resolve,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Discovery => "discovery",
            Phase::Cache => "cache",
            Phase::Registry => "registry",
            Phase::Resolve => "resolve",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("replmod::{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_basename_is_version_scoped() {
        assert_eq!(
            VersionInfo::new(3, 11).cache_basename(),
            ".python3.11-repl-modules.cache"
        );
        assert_eq!(
            VersionInfo::new(2, 7).cache_basename(),
            ".python2.7-repl-modules.cache"
        );
    }

    #[test]
    fn test_default_layout() {
        let layout = SourceLayout::default();
        assert_eq!(layout.extension, "py");
        assert_eq!(layout.package_marker, "__init__.py");
    }

    #[test]
    fn test_default_session_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.version, VersionInfo::new(3, 11));
        assert!(cfg.search_path.is_empty());
        assert!(cfg.builtin_modules.is_empty());
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Discovery.as_str(), "discovery");
        assert_eq!(Phase::Resolve.target(), "replmod::resolve");
    }

    #[test]
    fn test_deny_list_and_reserved_names() {
        assert!(DENY_LIST.contains(&"pycurl"));
        assert!(RESERVED_NAMES.contains(&"help"));
        assert!(!DENY_LIST.contains(&MAIN_MODULE));
    }
}
