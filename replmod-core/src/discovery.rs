//! Importable-name discovery.
//!
//! Walks every search-path entry and collects the dotted names of all
//! importable modules and packages, plus the interpreter's builtin module
//! names. Unreadable entries are skipped individually; a broken directory
//! never aborts the scan. Deny-listed names are excluded outright and
//! their packages are never descended into, so discovery cannot trigger
//! their import-time side effects; explicit loads remain possible.

use crate::loader::is_identifier;
use replmod_config::{SessionConfig, DENY_LIST, MAIN_MODULE};
use replmod_vfs::VirtualFileSystem;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Discover every importable module name reachable from the search path.
pub fn discover_names(vfs: &dyn VirtualFileSystem, config: &SessionConfig) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for root in &config.search_path {
        let entries = match vfs.read_dir(root) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(
                    target: "replmod::discovery",
                    path = %root.display(),
                    error = %err,
                    "skipping unreadable search path entry",
                );
                continue;
            }
        };

        for entry in entries {
            if entry.is_dir {
                let dir = root.join(&entry.name);
                if is_package(vfs, config, &dir) && is_identifier(&entry.name) {
                    walk_package(vfs, config, &dir, &entry.name, &mut names);
                }
            } else if let Some(stem) = module_stem(&entry.name, &config.layout.extension) {
                if !denied(stem) {
                    names.insert(stem.to_string());
                }
            }
        }
    }

    for builtin in &config.builtin_modules {
        if builtin != MAIN_MODULE && !denied(builtin) {
            names.insert(builtin.clone());
        }
    }

    debug!(target: "replmod::discovery", count = names.len(), "discovery finished");
    names
}

/// Collect `dotted` and its submodules. Deny-listed subtrees are pruned.
fn walk_package(
    vfs: &dyn VirtualFileSystem,
    config: &SessionConfig,
    dir: &Path,
    dotted: &str,
    names: &mut BTreeSet<String>,
) {
    if denied(dotted) {
        return;
    }
    names.insert(dotted.to_string());

    let entries = match vfs.read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(
                target: "replmod::discovery",
                path = %dir.display(),
                error = %err,
                "skipping unreadable package directory",
            );
            return;
        }
    };

    for entry in entries {
        if entry.is_dir {
            let child = dir.join(&entry.name);
            if is_package(vfs, config, &child) && is_identifier(&entry.name) {
                walk_package(vfs, config, &child, &format!("{}.{}", dotted, entry.name), names);
            }
        } else if let Some(stem) = module_stem(&entry.name, &config.layout.extension) {
            if stem != package_marker_stem(config) {
                let qualified = format!("{}.{}", dotted, stem);
                if !denied(&qualified) {
                    names.insert(qualified);
                }
            }
        }
    }
}

fn is_package(vfs: &dyn VirtualFileSystem, config: &SessionConfig, dir: &Path) -> bool {
    vfs.is_file(&dir.join(&config.layout.package_marker))
}

/// Module name of a source file, or None if the file is not a module.
fn module_stem<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    if is_identifier(stem) {
        Some(stem)
    } else {
        None
    }
}

fn package_marker_stem(config: &SessionConfig) -> &str {
    config
        .layout
        .package_marker
        .strip_suffix(&config.layout.extension)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(&config.layout.package_marker)
}

fn denied(name: &str) -> bool {
    DENY_LIST.contains(&name)
}
