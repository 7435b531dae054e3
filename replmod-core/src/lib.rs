//! replmod Core - Lazy module loading for an interactive shell
//!
//! Discovers every importable module name on the search path, caches the
//! list on disk keyed by interpreter version, and installs stand-in
//! proxies into the shell's namespace that perform the real import on
//! first meaningful access.
//!
//! All file access goes through `replmod-vfs`; configuration is passed
//! explicitly via `replmod_config::SessionConfig`, not via global state.

pub mod cache;
pub mod discovery;
pub mod help;
pub mod loader;
pub mod module;
pub mod namespace;
pub mod proxy;
pub mod registry;
pub mod value;

// Re-export common types
pub use cache::{CacheError, NameCache};
pub use discovery::discover_names;
pub use help::{help, install_help, render_module, Builtin};
pub use loader::{FileModuleLoader, LoadError, MemoryLoader, ModuleLoader};
pub use module::Module;
pub use namespace::Namespace;
pub use proxy::{LazyProxy, ProxyError, SessionContext};
pub use registry::LazyModuleRegistry;
pub use value::Value;

// Re-export config types from replmod-config
pub use replmod_config::{
    Phase, SessionConfig, SourceLayout, VersionInfo, DENY_LIST, MAIN_MODULE, RESERVED_NAMES,
};
