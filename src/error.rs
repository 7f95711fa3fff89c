//! Error types shared by the sort engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by sort, preview, unsort and the record store.
///
/// `InvalidTarget`, `ReadDir` and `CorruptRecord` abort a call before anything
/// is mutated. `CreateFolder` and `MoveFile` only ever affect one file and end
/// up as a [`FileFailure`]. `RecordPersist` and `Cleanup` happen after files
/// have already moved and are reported as warnings.
#[derive(Debug, Error)]
pub enum SortError {
    #[error("Invalid target directory {}: {reason}", .path.display())]
    InvalidTarget { path: PathBuf, reason: String },

    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("Could not create folder {}: {source}", .path.display())]
    CreateFolder { path: PathBuf, source: io::Error },

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Could not save sort record {}: {source}", .path.display())]
    RecordPersist { path: PathBuf, source: io::Error },

    #[error("Could not read sort record {}: {reason}", .path.display())]
    CorruptRecord { path: PathBuf, reason: String },

    #[error("Cleanup of {} failed: {source}", .path.display())]
    Cleanup { path: PathBuf, source: io::Error },
}

impl SortError {
    pub(crate) fn invalid_target<S: Into<String>>(path: impl Into<PathBuf>, reason: S) -> Self {
        SortError::InvalidTarget {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations.
pub type SortResult<T> = Result<T, SortError>;

/// One file (or record entry) that could not be moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Name of the file that failed.
    pub file_name: String,
    /// Human-readable cause.
    pub reason: String,
}

impl FileFailure {
    pub(crate) fn new(file_name: impl Into<String>, error: &SortError) -> Self {
        Self {
            file_name: file_name.into(),
            reason: error.to_string(),
        }
    }
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file_name, self.reason)
    }
}
