use std::path::PathBuf;
use thiserror::Error;

/// Result type for invocation and scratch-file operations
pub type Result<T> = std::result::Result<T, InvokeError>;

/// Errors raised before the external tool produced an answer
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The executable could not be started
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the child or reading its output failed
    #[error("Failed to collect output of `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Scratch file could not be created or written
    #[error("Failed to write temp file: {0}")]
    TempWrite(#[source] std::io::Error),

    /// Scratch file could not be read back
    #[error("Failed to read {path}: {source}")]
    TempRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
