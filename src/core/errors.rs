//! Shared error types for pytidy operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for analysis and refactoring operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed Python source; the file is skipped, never mutated
    #[error("syntax error in {}: {message} (line {line})", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Source parsed but contains constructs the serializer cannot render
    #[error("cannot serialize {}: {reason}", path.display())]
    Serialize { path: PathBuf, reason: String },

    /// Unreadable or unwritable path
    #[error("file access error on {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rejected before any file is touched; no partial report is produced
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
