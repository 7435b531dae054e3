//! Lazy module proxies.
//!
//! A [`LazyProxy`] stands in for a module that has not been imported yet.
//! Instead of intercepting attribute access, it exposes an explicit
//! accessor interface (`get` / `set` / `dir` / `resolve`) backed by a
//! single mutable slot: `Unresolved` until first meaningful use, then
//! permanently `Resolved` with the real module handle. Resolution also
//! rebinds the owning scope's entry, so later lookups bypass the proxy
//! entirely while stale references keep working through delegation.

use crate::loader::{LoadError, ModuleLoader};
use crate::module::Module;
use crate::namespace::Namespace;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::debug;

/// Proxy access error
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("module '{module}' has no attribute '{name}'")]
    MissingAttribute { module: String, name: String },
}

/// Shared state every proxy of one session points at: the discovered name
/// set (for child-proxy decisions) and the loader performing real imports.
#[derive(Clone)]
pub struct SessionContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    names: BTreeSet<String>,
    loader: Rc<dyn ModuleLoader>,
}

impl SessionContext {
    pub fn new(names: BTreeSet<String>, loader: Rc<dyn ModuleLoader>) -> Self {
        Self {
            inner: Rc::new(ContextInner { names, loader }),
        }
    }

    /// Is `name` a known discoverable module name?
    pub fn knows(&self, name: &str) -> bool {
        self.inner.names.contains(name)
    }

    fn load(&self, name: &str) -> Result<Module, LoadError> {
        self.inner.loader.load(name)
    }
}

/// Where a proxy's binding lives, for rebinding on resolution.
enum Owner {
    /// Top-level: the shell namespace itself.
    Scope(Namespace),
    /// Submodule: the parent proxy. Weak so parent-child pairs don't leak.
    Parent(Weak<ProxyInner>),
}

enum Slot {
    Unresolved,
    Resolved(Module),
}

struct ProxyInner {
    /// Fully qualified module name.
    name: String,
    /// Last segment: the name the owner binds this proxy under.
    attr_name: String,
    owner: Owner,
    slot: RefCell<Slot>,
    /// Proxy-local attributes: private names, child proxies, and mirrored
    /// public writes.
    locals: RefCell<BTreeMap<String, Value>>,
    context: SessionContext,
}

/// Stand-in for a not-yet-imported module. Cheaply clonable handle.
#[derive(Clone)]
pub struct LazyProxy {
    inner: Rc<ProxyInner>,
}

impl LazyProxy {
    /// Top-level proxy owned by `namespace`.
    pub fn new(name: impl Into<String>, namespace: &Namespace, context: &SessionContext) -> Self {
        let name = name.into();
        let attr_name = name.rsplit('.').next().unwrap_or(&name).to_string();
        Self {
            inner: Rc::new(ProxyInner {
                name,
                attr_name,
                owner: Owner::Scope(namespace.clone()),
                slot: RefCell::new(Slot::Unresolved),
                locals: RefCell::new(BTreeMap::new()),
                context: context.clone(),
            }),
        }
    }

    /// Child proxy for a known submodule, owned by `parent`.
    fn child(parent: &LazyProxy, attr: &str) -> Self {
        Self {
            inner: Rc::new(ProxyInner {
                name: format!("{}.{}", parent.inner.name, attr),
                attr_name: attr.to_string(),
                owner: Owner::Parent(Rc::downgrade(&parent.inner)),
                slot: RefCell::new(Slot::Unresolved),
                locals: RefCell::new(BTreeMap::new()),
                context: parent.inner.context.clone(),
            }),
        }
    }

    /// Fully qualified module name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Has the real import happened yet?
    pub fn is_resolved(&self) -> bool {
        matches!(*self.inner.slot.borrow(), Slot::Resolved(_))
    }

    /// The real module, if this proxy has been resolved.
    pub fn module(&self) -> Option<Module> {
        match &*self.inner.slot.borrow() {
            Slot::Resolved(module) => Some(module.clone()),
            Slot::Unresolved => None,
        }
    }

    /// Perform the deferred import. Idempotent: a resolved proxy returns
    /// the cached module without touching the loader again.
    ///
    /// On first resolution the owning scope's binding for this proxy's
    /// short name is replaced with the real module.
    pub fn resolve(&self) -> Result<Module, ProxyError> {
        if let Slot::Resolved(module) = &*self.inner.slot.borrow() {
            return Ok(module.clone());
        }

        let module = self.inner.context.load(&self.inner.name)?;
        *self.inner.slot.borrow_mut() = Slot::Resolved(module.clone());
        debug!(target: "replmod::resolve", module = %self.inner.name, "resolved lazy proxy");

        match &self.inner.owner {
            Owner::Scope(namespace) => {
                namespace.bind(&self.inner.attr_name, Value::Module(module.clone()));
            }
            Owner::Parent(parent) => {
                if let Some(parent) = parent.upgrade() {
                    parent
                        .locals
                        .borrow_mut()
                        .insert(self.inner.attr_name.clone(), Value::Module(module.clone()));
                    if let Slot::Resolved(parent_module) = &*parent.slot.borrow() {
                        parent_module.set(&self.inner.attr_name, Value::Module(module.clone()));
                    }
                }
            }
        }

        Ok(module)
    }

    /// Read an attribute.
    ///
    /// Private-prefixed names come from the proxy's own table and never
    /// trigger resolution. A name that forms a known submodule returns a
    /// (cached) child proxy, also without resolving. Anything else
    /// resolves first, then reads from the real module.
    pub fn get(&self, name: &str) -> Result<Value, ProxyError> {
        if name.starts_with('_') {
            return self.local(name);
        }

        let qualified = format!("{}.{}", self.inner.name, name);
        if self.inner.context.knows(&qualified) {
            if let Some(value) = self.inner.locals.borrow().get(name).cloned() {
                return Ok(value);
            }
            let child = LazyProxy::child(self, name);
            self.inner
                .locals
                .borrow_mut()
                .insert(name.to_string(), Value::Proxy(child.clone()));
            return Ok(Value::Proxy(child));
        }

        let module = self.resolve()?;
        module.get(name).ok_or_else(|| ProxyError::MissingAttribute {
            module: self.inner.name.clone(),
            name: name.to_string(),
        })
    }

    /// Write an attribute.
    ///
    /// Non-private names resolve first, then land on both the real module
    /// and the proxy's own table so legacy references stay consistent.
    /// Private names stay proxy-local.
    pub fn set(&self, name: &str, value: Value) -> Result<(), ProxyError> {
        if !name.starts_with('_') {
            let module = self.resolve()?;
            module.set(name, value.clone());
        }
        self.inner
            .locals
            .borrow_mut()
            .insert(name.to_string(), value);
        Ok(())
    }

    /// Introspect the module's attribute names. Resolves.
    pub fn dir(&self) -> Result<Vec<String>, ProxyError> {
        let module = self.resolve()?;
        Ok(module.attr_names())
    }

    /// Identity comparison of proxy handles.
    pub fn ptr_eq(&self, other: &LazyProxy) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn local(&self, name: &str) -> Result<Value, ProxyError> {
        self.inner
            .locals
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| ProxyError::MissingAttribute {
                module: self.inner.name.clone(),
                name: name.to_string(),
            })
    }
}

impl fmt::Display for LazyProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner.slot.borrow() {
            Slot::Resolved(module) => write!(f, "{}", module),
            Slot::Unresolved => {
                write!(f, "<module '{}' from '???' (not yet loaded)>", self.inner.name)
            }
        }
    }
}

impl fmt::Debug for LazyProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyProxy")
            .field("name", &self.inner.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;

    fn context_with(names: &[&str], modules: Vec<Module>) -> (SessionContext, Rc<MemoryLoader>) {
        let loader = Rc::new(MemoryLoader::new());
        for module in modules {
            loader.insert(module);
        }
        let names = names.iter().map(|s| s.to_string()).collect();
        let context = SessionContext::new(names, loader.clone() as Rc<dyn ModuleLoader>);
        (context, loader)
    }

    #[test]
    fn test_unresolved_display_placeholder() {
        let (context, loader) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        assert_eq!(
            proxy.to_string(),
            "<module 'os' from '???' (not yet loaded)>"
        );
        assert!(!proxy.is_resolved());
        assert_eq!(loader.total_loads(), 0);
    }

    #[test]
    fn test_resolve_rebinds_namespace() {
        let (context, _) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);
        ns.bind("os", Value::Proxy(proxy.clone()));

        let module = proxy.resolve().unwrap();
        assert!(proxy.is_resolved());
        match ns.get("os") {
            Some(Value::Module(bound)) => assert!(bound.ptr_eq(&module)),
            other => panic!("expected module binding, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let (context, loader) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        let first = proxy.resolve().unwrap();
        let second = proxy.resolve().unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(loader.load_count("os"), 1);
    }

    #[test]
    fn test_private_get_never_resolves() {
        let (context, loader) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        assert!(matches!(
            proxy.get("_private").unwrap_err(),
            ProxyError::MissingAttribute { .. }
        ));
        assert!(!proxy.is_resolved());
        assert_eq!(loader.total_loads(), 0);
    }

    #[test]
    fn test_child_proxy_does_not_resolve_parent() {
        let (context, loader) = context_with(
            &["pkg", "pkg.sub"],
            vec![Module::builtin("pkg"), Module::builtin("pkg.sub")],
        );
        let ns = Namespace::new();
        let proxy = LazyProxy::new("pkg", &ns, &context);

        let child = match proxy.get("sub").unwrap() {
            Value::Proxy(child) => child,
            other => panic!("expected child proxy, got {:?}", other),
        };
        assert_eq!(child.name(), "pkg.sub");
        assert!(!child.is_resolved());
        assert!(!proxy.is_resolved());
        assert_eq!(loader.total_loads(), 0);

        // Cached: the same child comes back
        match proxy.get("sub").unwrap() {
            Value::Proxy(again) => assert!(again.ptr_eq(&child)),
            other => panic!("expected child proxy, got {:?}", other),
        }
    }

    #[test]
    fn test_child_resolution_updates_parent_locals() {
        let (context, _) = context_with(
            &["pkg", "pkg.sub"],
            vec![Module::builtin("pkg"), Module::builtin("pkg.sub")],
        );
        let ns = Namespace::new();
        let proxy = LazyProxy::new("pkg", &ns, &context);

        let child = match proxy.get("sub").unwrap() {
            Value::Proxy(child) => child,
            other => panic!("expected child proxy, got {:?}", other),
        };
        let module = child.resolve().unwrap();

        // Parent stays unresolved but now hands out the real module
        assert!(!proxy.is_resolved());
        match proxy.get("sub").unwrap() {
            Value::Module(bound) => assert!(bound.ptr_eq(&module)),
            other => panic!("expected module, got {:?}", other),
        }
    }

    #[test]
    fn test_public_get_reads_real_module() {
        let module = Module::builtin("os");
        module.set("sep", Value::Str("/".into()));
        let (context, loader) = context_with(&["os"], vec![module]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        assert_eq!(proxy.get("sep").unwrap(), Value::Str("/".into()));
        assert_eq!(proxy.get("sep").unwrap(), Value::Str("/".into()));
        assert_eq!(loader.load_count("os"), 1);
    }

    #[test]
    fn test_missing_attribute_after_resolution() {
        let (context, _) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        assert!(matches!(
            proxy.get("nope").unwrap_err(),
            ProxyError::MissingAttribute { .. }
        ));
        assert!(proxy.is_resolved());
    }

    #[test]
    fn test_set_public_writes_through() {
        let (context, _) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        proxy.set("answer", Value::Int(42)).unwrap();
        assert!(proxy.is_resolved());
        assert_eq!(proxy.module().unwrap().get("answer"), Some(Value::Int(42)));
        assert_eq!(proxy.get("answer").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_set_private_stays_local() {
        let (context, loader) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        proxy.set("_mark", Value::Bool(true)).unwrap();
        assert!(!proxy.is_resolved());
        assert_eq!(loader.total_loads(), 0);
        assert_eq!(proxy.get("_mark").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_dir_resolves_and_lists() {
        let module = Module::builtin("os");
        module.set("sep", Value::Str("/".into()));
        module.set("name", Value::Str("posix".into()));
        let (context, _) = context_with(&["os"], vec![module]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);

        let listing = proxy.dir().unwrap();
        assert_eq!(listing, vec!["name".to_string(), "sep".to_string()]);
        assert!(proxy.is_resolved());
    }

    #[test]
    fn test_load_failure_propagates() {
        let (context, _) = context_with(&["ghost"], vec![]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("ghost", &ns, &context);

        assert!(matches!(
            proxy.get("anything").unwrap_err(),
            ProxyError::Load(LoadError::NotFound { .. })
        ));
        assert!(!proxy.is_resolved());
    }

    #[test]
    fn test_stale_reference_delegates_after_resolution() {
        let (context, _) = context_with(&["os"], vec![Module::builtin("os")]);
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);
        ns.bind("os", Value::Proxy(proxy.clone()));

        let stale = proxy.clone();
        let module = proxy.resolve().unwrap();
        module.set("sep", Value::Str("/".into()));

        // Binding was replaced, but the old handle still answers
        assert_eq!(stale.get("sep").unwrap(), Value::Str("/".into()));
        assert_eq!(stale.to_string(), module.to_string());
    }
}
