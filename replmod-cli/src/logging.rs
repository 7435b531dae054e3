//! CLI logging setup
//!
//! Phase-scoped log filtering built on `tracing-subscriber`.

use crate::config::LogConfig;
use std::io;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Colored multi-line output (development)
    Pretty,
    /// Compact single-line output
    Compact,
    /// JSON output (tool integration)
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Initialize logging with the given format, optionally teeing to a file.
pub fn init_with_file<P: AsRef<std::path::Path>>(
    log_config: &LogConfig,
    format: LogFormat,
    file: Option<P>,
) {
    let layers = build_layers(log_config, format, file);
    tracing_subscriber::registry().with(layers).init();
}

/// One formatted layer per sink, all filtered by the same phase targets.
/// Both the console and the file sink honor the requested format.
fn build_layers<P: AsRef<std::path::Path>>(
    log_config: &LogConfig,
    format: LogFormat,
    file: Option<P>,
) -> Vec<Box<dyn Layer<Registry> + Send + Sync>> {
    // Build filter targets
    let targets = Targets::new()
        .with_default(log_config.global)
        .with_target("replmod::discovery", log_config.level_for("replmod::discovery"))
        .with_target("replmod::cache", log_config.level_for("replmod::cache"))
        .with_target("replmod::registry", log_config.level_for("replmod::registry"))
        .with_target("replmod::resolve", log_config.level_for("replmod::resolve"))
        .with_target("replmod::cli", log_config.global);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![
        create_format_layer(format, io::stderr)
            .with_filter(targets.clone())
            .boxed(),
    ];

    if let Some(path) = file {
        let file_handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Failed to open log file");

        layers.push(
            create_format_layer(format, move || {
                file_handle.try_clone().expect("Failed to clone file handle")
            })
            .with_filter(targets)
            .boxed(),
        );
    }

    layers
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(
    format: LogFormat,
    make_writer: F,
) -> impl Layer<Registry>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("plain"), None);
    }

    #[test]
    fn test_console_only_builds_one_layer() {
        let layers = build_layers(&LogConfig::default(), LogFormat::Json, None::<&str>);
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn test_file_tee_builds_formatted_layer_per_sink() {
        let path = std::env::temp_dir().join(format!("replmod_log_{}", std::process::id()));
        for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json] {
            let layers = build_layers(&LogConfig::default(), format, Some(&path));
            assert_eq!(layers.len(), 2);
        }
        let _ = std::fs::remove_file(&path);
    }
}
