//! Error types for Skyline

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for Skyline operations
pub type SkylineResult<T> = Result<T, SkylineError>;

/// Main error type for Skyline
///
/// Heuristic ambiguity never shows up here: the matcher resolves missing
/// evidence to defaults. Only configuration problems, an unusable scan root
/// and write-boundary failures reach the caller.
#[derive(Error, Debug, Clone)]
pub enum SkylineError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scan root could not be used
    #[error("Scan error: {0}")]
    Scan(String),

    /// Rendered artifact could not be written
    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// Review collaborator errors
    #[error("Review error: {0}")]
    Review(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl SkylineError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new scan error
    pub fn scan(message: impl Into<String>) -> Self {
        Self::Scan(message.into())
    }

    /// Create a new write error for `path`
    pub fn write(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a new review error
    pub fn review(message: impl Into<String>) -> Self {
        Self::Review(message.into())
    }

    /// Whether the error happened at the filesystem write boundary
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

impl From<std::io::Error> for SkylineError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for SkylineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<toml::de::Error> for SkylineError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse TOML config: {}", error))
    }
}

impl From<toml::ser::Error> for SkylineError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Config(format!("Failed to serialize TOML config: {}", error))
    }
}

impl From<serde_yaml::Error> for SkylineError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Config(format!("Failed to parse YAML config: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_display_includes_path() {
        let err = SkylineError::write("/tmp/out/k8s/hpa.yaml", "permission denied");
        assert!(err.is_write_failure());
        assert_eq!(
            err.to_string(),
            "Failed to write /tmp/out/k8s/hpa.yaml: permission denied"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SkylineError = io.into();
        assert!(matches!(err, SkylineError::Io(_)));
        assert!(!err.is_write_failure());
    }
}
