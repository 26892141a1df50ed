//! Error types for the nwbkit configuration system

use std::path::PathBuf;

use nwbkit_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration file has an extension we cannot parse
    #[error("Unsupported configuration file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Configuration parsing or extraction failed
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

impl Severity for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        // Running with a policy the operator did not ask for is worse than
        // not starting.
        ErrorSeverity::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let err = ConfigError::FileNotFound {
            path: PathBuf::from("/tmp/nwbkit.toml"),
        };
        assert_eq!(err.to_string(), "Configuration file not found: /tmp/nwbkit.toml");
        assert!(err.is_critical());
    }
}
