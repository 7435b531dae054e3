//! CLI configuration
//!
//! Phase-scoped log levels layered over one global default.

use tracing::Level;

/// CLI log configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub discovery: Option<Level>,
    pub cache: Option<Level>,
    pub registry: Option<Level>,
    pub resolve: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            discovery: None,
            cache: None,
            registry: None,
            resolve: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific target
    pub fn level_for(&self, target: &str) -> Level {
        match target {
            "replmod::discovery" => self.discovery.unwrap_or(self.global),
            "replmod::cache" => self.cache.unwrap_or(self.global),
            "replmod::registry" => self.registry.unwrap_or(self.global),
            "replmod::resolve" => self.resolve.unwrap_or(self.global),
            _ => self.global,
        }
    }
}

/// Parse a log level name, case insensitive.
pub fn parse_log_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_falls_back_to_global() {
        let cfg = LogConfig {
            cache: Some(Level::DEBUG),
            ..LogConfig::default()
        };
        assert_eq!(cfg.level_for("replmod::cache"), Level::DEBUG);
        assert_eq!(cfg.level_for("replmod::discovery"), Level::WARN);
        assert_eq!(cfg.level_for("replmod::cli"), Level::WARN);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_log_level("warn"), Some(Level::WARN));
        assert_eq!(parse_log_level("verbose"), None);
    }
}
