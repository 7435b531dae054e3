//! The import mechanism behind the proxies.
//!
//! The registry never imports anything itself; it defers to a
//! [`ModuleLoader`]. The shipped [`FileModuleLoader`] resolves dotted names
//! against the search path through the VFS and answers builtin names with
//! file-less modules. Suites use [`MemoryLoader`] to observe exactly when
//! loads happen.

use crate::module::Module;
use replmod_config::SessionConfig;
use replmod_vfs::VirtualFileSystem;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Module load error
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No source file answers to the name
    NotFound {
        /// Qualified module name
        name: String,
        /// File paths that were tried
        tried: Vec<PathBuf>,
    },
    /// A candidate file exists but could not be read
    Read {
        /// File path
        path: PathBuf,
        /// Error message
        message: String,
    },
    /// The name is not a valid dotted module identifier
    InvalidName { name: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotFound { name, tried } => {
                write!(f, "Module '{}' not found.", name)?;
                if !tried.is_empty() {
                    write!(f, " Tried:")?;
                    for path in tried {
                        write!(f, "\n  - {}", path.display())?;
                    }
                }
                Ok(())
            }
            LoadError::Read { path, message } => {
                write!(f, "Failed to read '{}': {}", path.display(), message)
            }
            LoadError::InvalidName { name } => {
                write!(f, "'{}' is not a valid module name", name)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// The deferred import mechanism a session hands to its proxies.
pub trait ModuleLoader {
    /// Load the module behind `name`, performing whatever real work the
    /// import requires. Must be idempotent from the caller's point of
    /// view only in the sense that repeated calls return an equivalent
    /// module; callers (the proxies) guarantee each name is loaded once.
    fn load(&self, name: &str) -> Result<Module, LoadError>;
}

/// Is `s` a plausible module identifier segment?
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Loads modules from source files on the search path.
pub struct FileModuleLoader {
    vfs: Arc<dyn VirtualFileSystem>,
    config: SessionConfig,
    builtins: BTreeSet<String>,
}

impl FileModuleLoader {
    pub fn new(vfs: Arc<dyn VirtualFileSystem>, config: &SessionConfig) -> Self {
        let builtins = config
            .builtin_modules
            .iter()
            .filter(|name| name.as_str() != replmod_config::MAIN_MODULE)
            .cloned()
            .collect();
        Self {
            vfs,
            config: config.clone(),
            builtins,
        }
    }

    /// Candidate file paths for a dotted name, in search-path order.
    /// `pkg.sub` maps to `<root>/pkg/sub.py` then `<root>/pkg/sub/__init__.py`.
    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let relative: PathBuf = name.split('.').collect();
        let mut paths = Vec::new();
        for root in &self.config.search_path {
            paths.push(
                root.join(&relative)
                    .with_extension(&self.config.layout.extension),
            );
            paths.push(root.join(&relative).join(&self.config.layout.package_marker));
        }
        paths
    }
}

impl ModuleLoader for FileModuleLoader {
    fn load(&self, name: &str) -> Result<Module, LoadError> {
        if name.is_empty() || !name.split('.').all(is_identifier) {
            return Err(LoadError::InvalidName {
                name: name.to_string(),
            });
        }

        if self.builtins.contains(name) {
            debug!(target: "replmod::resolve", module = name, "loaded builtin module");
            return Ok(Module::builtin(name));
        }

        let mut tried = Vec::new();
        for candidate in self.candidates(name) {
            tried.push(candidate.clone());
            if !self.vfs.is_file(&candidate) {
                continue;
            }

            let content = self
                .vfs
                .read_file(&candidate)
                .map_err(|e| LoadError::Read {
                    path: candidate.clone(),
                    message: e.to_string(),
                })?;
            let source = String::from_utf8_lossy(&content);
            let doc = extract_doc(&source);

            debug!(
                target: "replmod::resolve",
                module = name,
                path = %candidate.display(),
                "loaded module from source file",
            );
            return Ok(Module::new(name, Some(candidate), doc));
        }

        Err(LoadError::NotFound {
            name: name.to_string(),
            tried,
        })
    }
}

/// Pull the leading comment block out of a source file as documentation.
/// A shebang line is skipped; the block ends at the first non-comment line.
fn extract_doc(source: &str) -> Option<String> {
    let mut lines = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let trimmed = line.trim_start();
        if i == 0 && trimmed.starts_with("#!") {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('#') {
            lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        } else {
            break;
        }
    }
    let doc = lines.join("\n");
    if doc.trim().is_empty() {
        None
    } else {
        Some(doc)
    }
}

/// Preset in-memory loader for test suites.
///
/// Counts how many times each name is loaded so idempotence properties can
/// be asserted.
#[derive(Default)]
pub struct MemoryLoader {
    modules: RefCell<BTreeMap<String, Module>>,
    load_counts: RefCell<BTreeMap<String, usize>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under its own qualified name.
    pub fn insert(&self, module: Module) {
        self.modules
            .borrow_mut()
            .insert(module.name().to_string(), module);
    }

    /// How many times `name` has been loaded.
    pub fn load_count(&self, name: &str) -> usize {
        self.load_counts.borrow().get(name).copied().unwrap_or(0)
    }

    /// Total loads across all names.
    pub fn total_loads(&self) -> usize {
        self.load_counts.borrow().values().sum()
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<Module, LoadError> {
        let module = self
            .modules
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_string(),
                tried: Vec::new(),
            })?;
        *self
            .load_counts
            .borrow_mut()
            .entry(name.to_string())
            .or_insert(0) += 1;
        Ok(module)
    }
}
