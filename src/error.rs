//! Error types for loading and aggregating bundle reports.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between reading the inputs and producing
/// the final bundle map. All variants are fatal.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error: {source} (path: {})", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("malformed document {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("cleaning report {origin} references unknown bundle '{bundle}'")]
    UnknownBundle { bundle: String, origin: String },

    #[error(
        "inlier {position} out of range for bundle '{bundle}' (current length {len}) in {origin}"
    )]
    IndexOutOfRange {
        bundle: String,
        position: i64,
        len: usize,
        origin: String,
    },

    #[error("cannot derive bundle name from '{file_name}': {reason}")]
    MalformedFilename { file_name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CompileError>;

impl CompileError {
    /// Classify a read failure, keeping "missing file" distinct from other I/O errors.
    pub fn from_read(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            CompileError::FileNotFound { path }
        } else {
            CompileError::Io { source, path }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_read_not_found() {
        let err = CompileError::from_read(
            std::io::Error::from(std::io::ErrorKind::NotFound),
            "missing.json",
        );
        assert!(matches!(err, CompileError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "file not found: missing.json");
    }

    #[test]
    fn test_from_read_other_io() {
        let err = CompileError::from_read(
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            "locked.json",
        );
        assert!(matches!(err, CompileError::Io { .. }));
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = CompileError::IndexOutOfRange {
            bundle: "AF_L".to_string(),
            position: 5,
            len: 3,
            origin: "s1__AF_L_report.json".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("inlier 5"));
        assert!(msg.contains("current length 3"));
    }
}
