use thiserror::Error;

/// Result type for context extraction
pub type Result<T> = std::result::Result<T, ContextError>;

/// Errors that can occur while extracting source context
#[derive(Error, Debug)]
pub enum ContextError {
    /// No visual selection, or it covers nothing
    #[error("No text selected")]
    NoSelection,

    /// Neither the syntax tree nor the line scan found a function
    #[error("No function found at line {line}")]
    NoFunction { line: usize },

    /// Whole-file mode on a buffer that was never saved
    #[error("Buffer has no file path; save it first")]
    NoPath,

    /// Bad explicit line range
    #[error("Invalid line range {start}-{end} (buffer has {len} lines)")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Unsupported language for AST parsing
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// Editor host failure
    #[error(transparent)]
    Editor(#[from] codeprompt_editor::EditorError),
}

impl ContextError {
    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// True for the "nothing to send" family: the user picked a mode the
    /// buffer cannot satisfy. These are warnings, not failures.
    pub fn is_missing_context(&self) -> bool {
        matches!(
            self,
            Self::NoSelection | Self::NoFunction { .. } | Self::NoPath | Self::InvalidRange { .. }
        )
    }
}
