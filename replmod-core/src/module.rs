//! Loaded module handles.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

struct ModuleInner {
    name: String,
    file: Option<PathBuf>,
    doc: Option<String>,
    attrs: RefCell<BTreeMap<String, Value>>,
}

/// A real, loaded module.
///
/// Cheaply clonable shared handle. All clones see the same attribute map,
/// so a write through one reference (a proxy keeping a legacy caller
/// consistent, say) is visible through every other.
#[derive(Clone)]
pub struct Module {
    inner: Rc<ModuleInner>,
}

impl Module {
    pub fn new(
        name: impl Into<String>,
        file: Option<PathBuf>,
        doc: Option<String>,
    ) -> Self {
        Self {
            inner: Rc::new(ModuleInner {
                name: name.into(),
                file,
                doc,
                attrs: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// A file-less module provided by the interpreter itself.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }

    /// Fully qualified module name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Source file the module was loaded from, if any.
    pub fn file(&self) -> Option<&Path> {
        self.inner.file.as_deref()
    }

    /// Documentation text extracted at load time, if any.
    pub fn doc(&self) -> Option<&str> {
        self.inner.doc.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.attrs.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.inner.attrs.borrow_mut().insert(name.into(), value);
    }

    /// Attribute names in sorted order.
    pub fn attr_names(&self) -> Vec<String> {
        self.inner.attrs.borrow().keys().cloned().collect()
    }

    /// Identity comparison: do both handles refer to the same module object?
    pub fn ptr_eq(&self, other: &Module) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file() {
            Some(path) => write!(f, "<module '{}' from '{}'>", self.name(), path.display()),
            None => write!(f, "<module '{}' (built-in)>", self.name()),
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.inner.name)
            .field("file", &self.inner.file)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_shared_between_clones() {
        let a = Module::new("os", None, None);
        let b = a.clone();

        a.set("sep", Value::Str("/".into()));
        assert_eq!(b.get("sep"), Some(Value::Str("/".into())));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_attr_names_sorted() {
        let m = Module::new("os", None, None);
        m.set("z", Value::Int(1));
        m.set("a", Value::Int(2));
        assert_eq!(m.attr_names(), vec!["a".to_string(), "z".to_string()]);
    }

    #[test]
    fn test_display_with_and_without_file() {
        let file = Module::new("os", Some(PathBuf::from("/lib/os.py")), None);
        assert_eq!(file.to_string(), "<module 'os' from '/lib/os.py'>");

        let builtin = Module::builtin("sys");
        assert_eq!(builtin.to_string(), "<module 'sys' (built-in)>");
    }
}
