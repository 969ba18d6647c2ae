//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage backend configuration is missing or invalid.
    ///
    /// Fatal: surfaced before any store operation is attempted.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Caller-supplied filename strategy failed.
    #[error("filename resolution failed: {0}")]
    FilenameResolution(String),

    /// Caller-supplied metadata strategy failed.
    #[error("metadata resolution failed: {0}")]
    MetadataResolution(String),

    /// Declared upload size exceeds the configured rule.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Declared upload size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Object store write failed.
    #[error("failed to write object '{key}': {message}")]
    Write {
        /// Object key the write targeted.
        key: String,
        /// Store-reported failure.
        message: String,
    },

    /// Object store delete failed.
    ///
    /// Collected per record during bulk delete rather than aborting the
    /// batch.
    #[error("failed to delete object '{key}': {message}")]
    Delete {
        /// Object key the delete targeted.
        key: String,
        /// Store-reported failure.
        message: String,
    },

    /// Presigned URL generation failed.
    #[error("failed to sign read URL for '{key}': {message}")]
    Sign {
        /// Object key the signature targeted.
        key: String,
        /// Store-reported failure.
        message: String,
    },
}

impl StorageError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a filename resolution error.
    #[must_use]
    pub fn filename_resolution(msg: impl Into<String>) -> Self {
        Self::FilenameResolution(msg.into())
    }

    /// Create a metadata resolution error.
    #[must_use]
    pub fn metadata_resolution(msg: impl Into<String>) -> Self {
        Self::MetadataResolution(msg.into())
    }

    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create a store write error.
    #[must_use]
    pub fn write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a store delete error.
    #[must_use]
    pub fn delete(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delete {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a URL signing error.
    #[must_use]
    pub fn sign(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sign {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_key() {
        let err = StorageError::write("uploads/a.txt", "connection refused");
        assert!(err.to_string().contains("uploads/a.txt"));
        assert!(err.to_string().contains("connection refused"));

        let err = StorageError::sign("uploads/a.txt", "invalid credentials");
        assert!(err.to_string().starts_with("failed to sign"));
    }

    #[test]
    fn test_file_too_large_message() {
        let err = StorageError::file_too_large(2048, 1024);
        assert_eq!(
            err.to_string(),
            "file size 2048 bytes exceeds maximum allowed 1024 bytes"
        );
    }
}
