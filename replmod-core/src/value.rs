//! Values bound in a shell namespace.

use crate::help::Builtin;
use crate::module::Module;
use crate::proxy::LazyProxy;
use std::fmt;

/// A value a namespace binding or module attribute can hold.
///
/// The shell's evaluator owns richer value kinds; the registry only needs
/// the ones that can appear in the top-level scope it manages.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    /// A fully loaded module.
    Module(Module),
    /// A stand-in for a module that has not been loaded yet.
    Proxy(LazyProxy),
    /// A function provided by the shell itself.
    Builtin(Builtin),
}

impl Value {
    /// Short kind name, used in diagnostics and help output.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Module(_) => "module",
            Value::Proxy(_) => "module (not yet loaded)",
            Value::Builtin(_) => "builtin",
        }
    }

    pub fn as_module(&self) -> Option<&Module> {
        match self {
            Value::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_proxy(&self) -> Option<&LazyProxy> {
        match self {
            Value::Proxy(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{}", s),
            Value::Module(m) => write!(f, "{}", m),
            Value::Proxy(p) => write!(f, "{}", p),
            Value::Builtin(b) => write!(f, "{}", b),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Module(a), Value::Module(b)) => a.ptr_eq(b),
            (Value::Proxy(a), Value::Proxy(b)) => a.ptr_eq(b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}
