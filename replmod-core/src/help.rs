//! The session-level `help` builtin.
//!
//! Installed into the namespace alongside the proxies. Applied to a lazy
//! proxy it resolves the proxy first and renders help for the real module,
//! so `help(os)` behaves identically whether `os` was loaded yet or not.

use crate::module::Module;
use crate::namespace::Namespace;
use crate::proxy::ProxyError;
use crate::value::Value;
use std::fmt;

/// Functions the shell itself provides in the top-level scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Help,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Help => "help",
        }
    }

    /// Invoke the builtin on one argument, producing display text.
    pub fn call(&self, arg: &Value) -> Result<String, ProxyError> {
        match self {
            Builtin::Help => help(arg),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<built-in function {}>", self.name())
    }
}

/// Bind the `help` builtin into `namespace`.
pub fn install_help(namespace: &Namespace) {
    namespace.bind("help", Value::Builtin(Builtin::Help));
}

/// Render help for any value. Proxies are resolved so the text always
/// describes the real module.
pub fn help(value: &Value) -> Result<String, ProxyError> {
    match value {
        Value::Proxy(proxy) => Ok(render_module(&proxy.resolve()?)),
        Value::Module(module) => Ok(render_module(module)),
        Value::Builtin(builtin) => Ok(format!("Help on built-in function {}", builtin.name())),
        other => Ok(format!("{} instance: {}", other.kind(), other)),
    }
}

/// Module help text: name, origin file, description, public contents.
pub fn render_module(module: &Module) -> String {
    let mut text = format!("Help on module {}:\n\nNAME\n    {}\n", module.name(), module.name());

    text.push_str("\nFILE\n");
    match module.file() {
        Some(path) => text.push_str(&format!("    {}\n", path.display())),
        None => text.push_str("    (built-in)\n"),
    }

    if let Some(doc) = module.doc() {
        text.push_str("\nDESCRIPTION\n");
        for line in doc.lines() {
            text.push_str(&format!("    {}\n", line));
        }
    }

    let public: Vec<String> = module
        .attr_names()
        .into_iter()
        .filter(|name| !name.starts_with('_'))
        .collect();
    if !public.is_empty() {
        text.push_str("\nCONTENTS\n");
        for name in public {
            text.push_str(&format!("    {}\n", name));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{MemoryLoader, ModuleLoader};
    use crate::proxy::{LazyProxy, SessionContext};
    use std::path::PathBuf;
    use std::rc::Rc;

    #[test]
    fn test_install_binds_help() {
        let ns = Namespace::new();
        install_help(&ns);
        assert_eq!(ns.get("help"), Some(Value::Builtin(Builtin::Help)));
    }

    #[test]
    fn test_render_module_sections() {
        let module = Module::new(
            "os",
            Some(PathBuf::from("/lib/os.py")),
            Some("OS interface".to_string()),
        );
        module.set("sep", Value::Str("/".into()));
        module.set("_private", Value::Int(1));

        let text = render_module(&module);
        assert!(text.contains("Help on module os:"));
        assert!(text.contains("NAME\n    os"));
        assert!(text.contains("FILE\n    /lib/os.py"));
        assert!(text.contains("DESCRIPTION\n    OS interface"));
        assert!(text.contains("CONTENTS\n    sep"));
        assert!(!text.contains("_private"));
    }

    #[test]
    fn test_help_on_builtin_module_reports_origin() {
        let text = render_module(&Module::builtin("sys"));
        assert!(text.contains("FILE\n    (built-in)"));
    }

    #[test]
    fn test_help_resolves_proxy() {
        let loader = Rc::new(MemoryLoader::new());
        loader.insert(Module::builtin("os"));
        let context = SessionContext::new(
            ["os".to_string()].into_iter().collect(),
            loader.clone() as Rc<dyn ModuleLoader>,
        );
        let ns = Namespace::new();
        let proxy = LazyProxy::new("os", &ns, &context);
        assert!(!proxy.is_resolved());

        let text = Builtin::Help.call(&Value::Proxy(proxy.clone())).unwrap();
        assert!(text.contains("Help on module os:"));
        assert!(proxy.is_resolved());
        assert_eq!(loader.load_count("os"), 1);
    }

    #[test]
    fn test_help_on_scalar() {
        let text = help(&Value::Int(3)).unwrap();
        assert!(text.contains("int"));
    }
}
