//! replmod API - Session orchestration layer
//!
//! Provides a unified entry point for embedding the lazy module
//! machinery in an interactive shell:
//! - Session construction (namespace + registry + proxy install)
//! - Configuration detection from the environment
//! - Unified error handling (ReplmodError)
//!
//! For CLI convenience, this crate provides a global singleton config.
//! For library use, prefer the explicit `Session::start_with_vfs` API.

use std::sync::Arc;
use tracing::info;

// Re-export config
pub mod config;
pub use config::{config as get_config, detect, init as init_config, is_initialized, parse_version};

// Re-export config types from replmod_config
pub use replmod_config::{
    Phase, SessionConfig, SourceLayout, VersionInfo, DENY_LIST, MAIN_MODULE, RESERVED_NAMES,
};

// Re-export error and core types
pub mod error;
pub use error::{CacheError, LoadError, ProxyError, ReplmodError};

pub use replmod_core;
pub use replmod_core::{LazyModuleRegistry, LazyProxy, Module, Namespace, Value};
use replmod_core::{help, NameCache};
use replmod_vfs::{NativeFileSystem, VirtualFileSystem};

/// A configured interactive session: one namespace populated with lazy
/// proxies and the registry that maintains its name cache.
pub struct Session {
    registry: LazyModuleRegistry,
    namespace: Namespace,
    installed: usize,
}

impl Session {
    /// Start a session against the real file system.
    ///
    /// Installation never fails: on error the namespace stays usable and
    /// `installed()` reports zero proxies.
    pub fn start(config: SessionConfig) -> Session {
        Self::start_with_vfs(Arc::new(NativeFileSystem::new()), config)
    }

    /// Start a session against an explicit file system.
    pub fn start_with_vfs(vfs: Arc<dyn VirtualFileSystem>, config: SessionConfig) -> Session {
        info!(target: "replmod::registry", "starting session");
        let registry = LazyModuleRegistry::new(vfs, config);
        let namespace = Namespace::new();
        let installed = registry.install(&namespace);
        info!(target: "replmod::registry", installed, "session ready");
        Session {
            registry,
            namespace,
            installed,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn registry(&self) -> &LazyModuleRegistry {
        &self.registry
    }

    /// Number of proxies bound at startup.
    pub fn installed(&self) -> usize {
        self.installed
    }

    /// Look a name up in the session namespace.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.namespace.get(name)
    }

    /// Render help text for a bound name, resolving its proxy if needed.
    pub fn help(&self, name: &str) -> Result<String, ReplmodError> {
        let value = self
            .namespace
            .get(name)
            .ok_or_else(|| ReplmodError::Undefined(name.to_string()))?;
        Ok(help(&value)?)
    }

    /// The name cache backing this session.
    pub fn cache(&self) -> NameCache {
        self.registry.cache()
    }
}

/// Start a session with configuration detected from the environment.
pub fn quick_start() -> Session {
    Session::start(config::detect())
}

/// Start a session using the global config (for CLI use).
///
/// # Panics
/// If global config is not initialized
pub fn start() -> Session {
    Session::start(get_config().clone())
}
