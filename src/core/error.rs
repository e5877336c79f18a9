//! Error types for protowiki
//!
//! This module provides structured error handling using thiserror.
//! Only missing input roots and output failures are fatal; everything the
//! extractor cannot recognize is skipped without producing an error.

use thiserror::Error;
use std::path::PathBuf;

/// Result type alias for wiki generation
pub type Result<T> = std::result::Result<T, WikiError>;

/// Errors that can occur while extracting or rendering a protocol model
#[derive(Error, Debug)]
pub enum WikiError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol root not found
    #[error("Protocol directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Packets subdirectory not found under the protocol root
    #[error("Packets directory not found: {path}")]
    PacketsDirNotFound { path: PathBuf },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source unit is not valid UTF-8
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<WikiError>,
    },
}

impl WikiError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        WikiError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        WikiError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| WikiError::from(e).with_context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WikiError::DirectoryNotFound {
            path: PathBuf::from("/tmp/missing"),
        };
        assert!(err.to_string().contains("/tmp/missing"));
        assert!(err.to_string().starts_with("Protocol directory not found"));
    }

    #[test]
    fn test_packets_dir_error_display() {
        let err = WikiError::PacketsDirNotFound {
            path: PathBuf::from("proto/packets"),
        };
        assert_eq!(err.to_string(), "Packets directory not found: proto/packets");
    }

    #[test]
    fn test_error_with_context() {
        let err = WikiError::invalid_config("bad value");
        let wrapped = err.with_context("loading config");
        assert!(wrapped.to_string().contains("loading config"));
        assert!(wrapped.to_string().contains("bad value"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WikiError = io_err.into();
        assert!(matches!(err, WikiError::Io(_)));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(WikiError::invalid_config("test"));
        let err = result.context("during processing").unwrap_err();
        assert!(err.to_string().contains("during processing"));
    }

    #[test]
    fn test_io_result_ext_context() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = result.context("writing Home.md").unwrap_err();
        assert!(matches!(err, WikiError::WithContext { .. }));
        assert!(err.to_string().starts_with("writing Home.md"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: WikiError = json_err.into();
        assert!(matches!(err, WikiError::Json(_)));
    }
}
