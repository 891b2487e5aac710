//! Error types for the restful core library.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for restful.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed site or `restful` configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A post or term is missing a required field or breaks a uniqueness rule.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn invalid_config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_invalid_config_error() {
        let err = CoreError::invalid_config("restful.posts_size must be an integer");
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.to_string().contains("posts_size"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_invalid_config_with_source() {
        let io_err = std::io::Error::other("boom");
        let err = CoreError::invalid_config_with_source("reading config", io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_validation_error() {
        let err = CoreError::validation("post at index 3 has an empty slug");
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("empty slug"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
