//! API error types
//!
//! One umbrella error over the cache, load, and resolve phases, so
//! callers match on a single type.

use thiserror::Error;

pub use replmod_core::{CacheError, LoadError, ProxyError};

/// Unified session error.
#[derive(Error, Debug)]
pub enum ReplmodError {
    /// Name cache could not be read or written
    #[error("{0}")]
    Cache(#[from] CacheError),

    /// Module lookup or read failed
    #[error("{0}")]
    Load(#[from] LoadError),

    /// Proxy resolution failed
    #[error("{0}")]
    Proxy(#[from] ProxyError),

    /// A name the namespace does not bind
    #[error("name '{0}' is not defined")]
    Undefined(String),

    /// A version string that is not "major.minor"
    #[error("invalid version '{0}', expected 'major.minor'")]
    InvalidVersion(String),
}

impl ReplmodError {
    /// Phase name for diagnostics and log routing.
    pub fn phase(&self) -> &'static str {
        match self {
            ReplmodError::Cache(_) => "cache",
            ReplmodError::Load(_) => "load",
            ReplmodError::Proxy(_) => "resolve",
            ReplmodError::Undefined(_) => "session",
            ReplmodError::InvalidVersion(_) => "config",
        }
    }
}
