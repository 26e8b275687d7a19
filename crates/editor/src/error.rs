use std::path::PathBuf;
use thiserror::Error;

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors raised by buffer and host operations
#[derive(Error, Debug)]
pub enum EditorError {
    /// Line range outside the buffer
    #[error("Invalid line range: start={start}, end={end}, buffer has {len} lines")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Cursor outside the buffer
    #[error("Invalid cursor position: line {line}")]
    InvalidCursor { line: usize },

    /// Buffer has no file on disk
    #[error("Buffer has no associated path")]
    NoPath,

    /// Failed to read or write the backing file
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host could not show a panel or prompt
    #[error("Host error: {0}")]
    Host(String),
}

impl EditorError {
    /// Create an IO error tagged with the file it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a host error
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}
