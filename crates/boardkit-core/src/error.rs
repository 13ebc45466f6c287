//! Error types for boardkit core.
//!
//! Handle resolution has a single failure kind, [`BoardkitError::InvalidInstance`].
//! The remaining variants cover instance construction and the collaborator
//! managers.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for boardkit core.
#[derive(Debug, Error)]
pub enum BoardkitError {
    /// The handle does not resolve to a live instance.
    #[error("Invalid instance")]
    InvalidInstance,

    #[error("No instance IDs left to allocate")]
    InstanceIdsExhausted,

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Library errors
    #[error("Library not found: {name}")]
    LibraryNotFound { name: String },

    #[error("Invalid version {version}: {message}")]
    InvalidVersion { version: String, message: String },
}

/// Result type alias for boardkit operations.
pub type Result<T> = std::result::Result<T, BoardkitError>;

impl From<std::io::Error> for BoardkitError {
    fn from(err: std::io::Error) -> Self {
        BoardkitError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl BoardkitError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        BoardkitError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a version error from a rejected version string.
    pub fn invalid_version(version: impl Into<String>, err: semver::Error) -> Self {
        BoardkitError::InvalidVersion {
            version: version.into(),
            message: err.to_string(),
        }
    }

    /// Whether this error reports an unresolved instance handle.
    pub fn is_invalid_instance(&self) -> bool {
        matches!(self, BoardkitError::InvalidInstance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(BoardkitError::InvalidInstance.to_string(), "Invalid instance");

        let err = BoardkitError::LibraryNotFound {
            name: "Servo".into(),
        };
        assert_eq!(err.to_string(), "Library not found: Servo");
    }

    #[test]
    fn test_io_with_path_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BoardkitError::io_with_path(io, "/data/tmp");
        match err {
            BoardkitError::Io { path, source, .. } => {
                assert_eq!(path, Some(PathBuf::from("/data/tmp")));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_version_message() {
        let parse_err = semver::Version::parse("one.two").unwrap_err();
        let err = BoardkitError::invalid_version("one.two", parse_err);
        assert!(err.to_string().starts_with("Invalid version one.two"));
    }

    #[test]
    fn test_is_invalid_instance() {
        assert!(BoardkitError::InvalidInstance.is_invalid_instance());
        assert!(!BoardkitError::InstanceIdsExhausted.is_invalid_instance());
    }
}
