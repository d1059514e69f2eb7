//! Error types for bk-core
//!
//! Provides the unified error taxonomy shared by the facade, the backends,
//! and the CLI, plus the mapping to stable exit codes.

use thiserror::Error;

/// Result type alias for bk-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bucketkit operations
#[derive(Error, Debug)]
pub enum Error {
    /// Backend connect call failed; the facade cannot be constructed
    #[error("Connection to backend failed: {0}")]
    ConnectionFailed(String),

    /// Object, bucket, or metadata absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Copy source and destination resolve to the same path
    #[error("Cannot copy an object onto itself: {0}")]
    SelfCopy(String),

    /// Native or fallback copy failed
    #[error("Copy failed: {0}")]
    CopyFailed(String),

    /// Write to the backend failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// The backend does not implement the invoked call
    #[error("Method not supported by backend: {0}")]
    MethodNotSupported(String),

    /// A local or remote source required for a transfer is missing
    #[error("Source missing: {0}")]
    SourceMissing(String),

    /// Delete call failed
    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    /// Recognized operation path that is intentionally unimplemented
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Invalid path or key format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// Store alias already exists
    #[error("Alias already exists: {0}")]
    AliasExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Any other backend failure, with the original cause attached
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,                        // UsageError
            Error::Config(_) => 2,                             // UsageError
            Error::ConnectionFailed(_) => 3,                   // ConnectionError
            Error::NotFound(_) | Error::AliasNotFound(_) => 5, // NotFound
            Error::SelfCopy(_) | Error::AliasExists(_) => 6,   // Conflict
            Error::NotSupported(_) | Error::MethodNotSupported(_) => 7, // Unsupported
            _ => 1,                                            // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::ConnectionFailed("test".into()).exit_code(), 3);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::AliasNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::SelfCopy("test".into()).exit_code(), 6);
        assert_eq!(Error::NotSupported("test".into()).exit_code(), 7);
        assert_eq!(Error::MethodNotSupported("test".into()).exit_code(), 7);
        assert_eq!(Error::CopyFailed("test".into()).exit_code(), 1);
        assert_eq!(Error::UploadFailed("test".into()).exit_code(), 1);
        assert_eq!(Error::DeleteFailed("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::SelfCopy("data/a/x.txt".into());
        assert_eq!(
            err.to_string(),
            "Cannot copy an object onto itself: data/a/x.txt"
        );

        let err = Error::NotFound("data/missing.txt".into());
        assert_eq!(err.to_string(), "Not found: data/missing.txt");
    }

    #[test]
    fn test_backend_error_preserves_cause() {
        let cause = std::io::Error::other("disk unplugged");
        let err = Error::Backend(anyhow::Error::new(cause).context("listing entries"));
        assert!(err.to_string().contains("listing entries"));
        assert_eq!(err.exit_code(), 1);
    }
}
