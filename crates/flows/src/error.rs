use codeprompt_context::ContextError;
use codeprompt_editor::{EditorError, Severity};
use codeprompt_invoke::InvokeError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for flows
pub type Result<T> = std::result::Result<T, FlowError>;

/// Everything that can end a flow early
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Non-zero exit; `output` is what the tool printed
    #[error("{program} failed{}:\n{output}", .code.map(|c| format!(" (exit {c})")).unwrap_or_default())]
    ToolFailed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// Successful exit without any output
    #[error("{program} returned no output")]
    EmptyResponse { program: String },

    #[error("No code found in the response")]
    NoCodeBlocks,

    #[error("Refusing to overwrite {}", .0.display())]
    FileExists(PathBuf),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid line number: {0:?}")]
    InvalidNumber(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FlowError {
    /// Notification level for this error.
    ///
    /// Missing context and empty results are warnings; I/O and tool
    /// failures are errors.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Context(e) if e.is_missing_context() => Severity::Warn,
            Self::EmptyResponse { .. }
            | Self::NoCodeBlocks
            | Self::InvalidNumber(_)
            | Self::UnknownCommand(_) => Severity::Warn,
            Self::Context(_)
            | Self::Invoke(_)
            | Self::Editor(_)
            | Self::ToolFailed { .. }
            | Self::FileExists(_)
            | Self::Write { .. }
            | Self::Config(_) => Severity::Error,
        }
    }
}
