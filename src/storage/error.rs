//! Local store error types.
//!
//! These never reach the dashboard: [`super::Storage::load`] and
//! [`super::Storage::save`] log them and degrade to "no data".

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the local store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or renaming a file failed.
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized.
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value is not valid JSON for the requested type.
    #[error("failed to decode stored value for '{key}': {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Returns true if the stored data was present but corrupt.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<u32>("not json").unwrap_err()
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::Io {
            path: PathBuf::from("/tmp/x.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/x.json"));
        assert!(err.to_string().contains("denied"));

        let err = StorageError::Decode {
            key: "retrodash_timer",
            source: json_error(),
        };
        assert!(err.to_string().contains("retrodash_timer"));
    }

    #[test]
    fn test_predicates() {
        let decode = StorageError::Decode {
            key: "k",
            source: json_error(),
        };
        assert!(decode.is_decode_error());

        let io = StorageError::Io {
            path: PathBuf::new(),
            source: std::io::Error::other("boom"),
        };
        assert!(!io.is_decode_error());
    }
}
