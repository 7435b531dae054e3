//! replmod CLI - Inspect and maintain the lazy module name cache
//!
//! Project-based configuration - search path and version from an
//! optional JSON project file, the environment otherwise.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

mod config;
mod logging;

use crate::config::{parse_log_level, LogConfig};
use crate::logging::LogFormat;
use replmod_api::{detect, init_config, parse_version, ReplmodError, SessionConfig};
use replmod_core::{render_module, FileModuleLoader, LazyModuleRegistry, ModuleLoader};
use replmod_vfs::NativeFileSystem;

/// Project file structure
#[derive(Debug, serde::Deserialize)]
struct ProjectJson {
    /// Module search path entries, scanned in order
    path: Vec<String>,
    /// Interpreter version, "major.minor"
    version: Option<String>,
    /// Directory the cache file lives in
    home: Option<String>,
}

#[derive(Parser)]
#[command(
    name = "replmod",
    about = "Lazy module name cache - inspection and maintenance",
    version = "0.1.0"
)]
struct Cli {
    /// Project file overriding the detected configuration
    #[arg(long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log format: pretty, compact, json
    #[arg(long, default_value = "compact")]
    log_format: String,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the name cache unconditionally
    Refresh,
    /// List cached module names
    List {
        /// Include dotted submodule names
        #[arg(long)]
        all: bool,
    },
    /// Report whether the cache is out of date
    Stale,
    /// Show help text for one module
    Info {
        /// Qualified module name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        global: parse_log_level(&cli.log_level).unwrap_or_else(|| {
            eprintln!("Error: unknown log level '{}'", cli.log_level);
            process::exit(1);
        }),
        ..LogConfig::default()
    };
    let format = LogFormat::parse(&cli.log_format).unwrap_or_else(|| {
        eprintln!("Error: unknown log format '{}'", cli.log_format);
        process::exit(1);
    });
    logging::init_with_file(&log_config, format, cli.log_file.as_ref());

    let session_config = match build_session_config(cli.project.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Initialize API config (global singleton for convenience)
    init_config(session_config.clone());

    let registry = LazyModuleRegistry::new(Arc::new(NativeFileSystem::new()), session_config);

    let result = match cli.command {
        Command::Refresh => handle_refresh(&registry),
        Command::List { all } => handle_list(&registry, all),
        Command::Stale => handle_stale(&registry),
        Command::Info { name } => handle_info(&registry, &name),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Detected configuration with project-file overrides applied.
fn build_session_config(project: Option<&Path>) -> Result<SessionConfig, String> {
    let mut config = detect();

    if let Some(path) = project {
        let project = read_project_json(path)?;

        config.search_path = project.path.iter().map(PathBuf::from).collect();
        if let Some(version) = &project.version {
            config.version = parse_version(version)
                .ok_or_else(|| ReplmodError::InvalidVersion(version.clone()).to_string())?;
        }
        if let Some(home) = &project.home {
            config.home_dir = PathBuf::from(home);
        }
    }

    Ok(config)
}

/// Read and parse the project file
fn read_project_json(path: &Path) -> Result<ProjectJson, String> {
    if !path.exists() {
        return Err(format!("project file '{}' not found", path.display()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;

    let project: ProjectJson = serde_json::from_str(&content)
        .map_err(|e| format!("cannot parse '{}': {}", path.display(), e))?;

    if project.path.is_empty() {
        return Err(format!("'{}' has an empty 'path' list", path.display()));
    }

    Ok(project)
}

fn handle_refresh(registry: &LazyModuleRegistry) -> Result<(), ReplmodError> {
    let names = registry.refresh()?;
    println!(
        "Updated {} ({} names)",
        registry.cache().path().display(),
        names.len()
    );
    Ok(())
}

fn handle_list(registry: &LazyModuleRegistry, all: bool) -> Result<(), ReplmodError> {
    let names = registry.build_or_load_cache()?;
    for name in &names {
        if all || !name.contains('.') {
            println!("{}", name);
        }
    }
    Ok(())
}

fn handle_stale(registry: &LazyModuleRegistry) -> Result<(), ReplmodError> {
    let cache = registry.cache();
    let state = if cache.is_stale(&registry.config().search_path) {
        "stale"
    } else {
        "fresh"
    };
    println!("{}: {}", cache.path().display(), state);
    Ok(())
}

fn handle_info(registry: &LazyModuleRegistry, name: &str) -> Result<(), ReplmodError> {
    let loader = FileModuleLoader::new(
        Arc::new(NativeFileSystem::new()),
        registry.config(),
    );
    let module = loader.load(name)?;
    print!("{}", render_module(&module));
    Ok(())
}
