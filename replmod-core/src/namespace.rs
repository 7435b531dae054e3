//! The shell's top-level scope, modeled as an explicit registry object.
//!
//! Created when the interactive session starts, dropped when it ends.
//! Proxies hold a clone of the namespace so resolution can replace their
//! own binding with the real module.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Name-to-value bindings presented to the interactive user.
#[derive(Clone, Default)]
pub struct Namespace {
    bindings: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous binding.
    pub fn bind(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.bindings.borrow_mut().remove(name)
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("len", &self.len())
            .finish()
    }
}
