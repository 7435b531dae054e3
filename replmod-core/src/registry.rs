//! The lazy module registry.
//!
//! Ties the pieces together: loads or rebuilds the name cache, installs
//! one proxy per top-level name into the namespace, and binds the `help`
//! builtin. The whole installation routine is failure-proof: the shell
//! must start even when every part of it goes wrong.

use crate::cache::{CacheError, NameCache};
use crate::discovery::discover_names;
use crate::help::install_help;
use crate::loader::{FileModuleLoader, ModuleLoader};
use crate::namespace::Namespace;
use crate::proxy::{LazyProxy, SessionContext};
use crate::value::Value;
use replmod_config::{SessionConfig, RESERVED_NAMES};
use replmod_vfs::VirtualFileSystem;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Populates an interactive session's namespace with deferred-import
/// placeholders for every module reachable from the search path.
pub struct LazyModuleRegistry {
    vfs: Arc<dyn VirtualFileSystem>,
    config: SessionConfig,
    loader: Rc<dyn ModuleLoader>,
}

impl LazyModuleRegistry {
    /// Registry with the standard file-backed loader.
    pub fn new(vfs: Arc<dyn VirtualFileSystem>, config: SessionConfig) -> Self {
        let loader = Rc::new(FileModuleLoader::new(vfs.clone(), &config));
        Self::with_loader(vfs, config, loader)
    }

    /// Registry with a custom import mechanism.
    pub fn with_loader(
        vfs: Arc<dyn VirtualFileSystem>,
        config: SessionConfig,
        loader: Rc<dyn ModuleLoader>,
    ) -> Self {
        Self {
            vfs,
            config,
            loader,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The name cache this registry reads and writes.
    pub fn cache(&self) -> NameCache {
        NameCache::new(
            self.vfs.clone(),
            &self.config.home_dir,
            &self.config.version,
        )
    }

    /// Return the importable name set, from the cache when fresh, from a
    /// full discovery walk (rewriting the cache) when stale or unreadable.
    pub fn build_or_load_cache(&self) -> Result<BTreeSet<String>, CacheError> {
        let cache = self.cache();
        if cache.is_stale(&self.config.search_path) {
            return self.rebuild(&cache);
        }
        match cache.load() {
            Ok(names) => {
                debug!(
                    target: "replmod::cache",
                    count = names.len(),
                    "loaded module names from cache",
                );
                Ok(names)
            }
            // Corrupt-but-fresh content also counts as stale
            Err(err) => {
                warn!(target: "replmod::cache", error = %err, "cache unreadable, rebuilding");
                self.rebuild(&cache)
            }
        }
    }

    /// Re-discover and rewrite the cache regardless of freshness.
    pub fn refresh(&self) -> Result<BTreeSet<String>, CacheError> {
        self.rebuild(&self.cache())
    }

    fn rebuild(&self, cache: &NameCache) -> Result<BTreeSet<String>, CacheError> {
        info!(target: "replmod::cache", "module name cache is out of date; updating");
        let names = discover_names(self.vfs.as_ref(), &self.config);
        cache.store(&names)?;
        info!(target: "replmod::cache", count = names.len(), "done updating cache");
        Ok(names)
    }

    /// Bind one fresh proxy per top-level discovered name.
    ///
    /// Dotted names are reachable through their parent's proxy instead,
    /// and reserved shell identifiers are never shadowed. Returns the
    /// number of proxies bound.
    pub fn install_proxies(&self, names: &BTreeSet<String>, namespace: &Namespace) -> usize {
        let context = SessionContext::new(names.clone(), Rc::clone(&self.loader));
        let mut installed = 0;
        for name in names {
            if name.contains('.') || RESERVED_NAMES.contains(&name.as_str()) {
                continue;
            }
            namespace.bind(
                name.clone(),
                Value::Proxy(LazyProxy::new(name.clone(), namespace, &context)),
            );
            installed += 1;
        }
        debug!(target: "replmod::registry", installed, "installed lazy proxies");
        installed
    }

    /// The full installation routine with errors propagated.
    pub fn try_install(&self, namespace: &Namespace) -> Result<usize, CacheError> {
        // Bound before any cache work so a cache failure cannot take
        // `help` away from the session.
        install_help(namespace);
        let names = self.build_or_load_cache()?;
        Ok(self.install_proxies(&names, namespace))
    }

    /// Install proxies and the `help` builtin, swallowing every failure.
    ///
    /// On error a single diagnostic line is emitted and the namespace is
    /// left as-is: the shell still starts, builtins and manual imports
    /// still work. Returns the number of proxies bound.
    pub fn install(&self, namespace: &Namespace) -> usize {
        match self.try_install(namespace) {
            Ok(installed) => installed,
            Err(err) => {
                debug!(
                    target: "replmod::registry",
                    error = %err,
                    "failed to configure lazy-loaded modules",
                );
                eprintln!("Failed to configure lazy-loaded modules: {}", err);
                0
            }
        }
    }
}
