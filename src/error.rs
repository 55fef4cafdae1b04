//! Centralized error types for the postcard store.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the postcards library.
#[derive(Error, Debug)]
pub enum PostcardError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error on a reader with no file behind it.
    #[error("I/O error on input stream: {0}")]
    Stream(#[from] std::io::Error),

    /// The specified file does not exist.
    #[error("Postcard file not found: {0}")]
    FileNotFound(PathBuf),

    /// A source line does not match `date:<DATE>; from:<SENDER>; to:<RECEIVER>;`.
    ///
    /// `line` is 1-based within the source passed to a single ingest call.
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A search query string could not be understood.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Convenience alias for `Result<T, PostcardError>`.
pub type Result<T> = std::result::Result<T, PostcardError>;

impl PostcardError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Parse` variant for the given 1-based line number.
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Whether this error came from malformed input rather than the environment.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
