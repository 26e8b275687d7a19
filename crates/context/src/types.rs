use crate::language::Language;
use std::fmt;
use std::path::PathBuf;

/// What source text the user chose to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    /// The visual selection
    Selection,
    /// The function around the cursor
    Function,
    /// The whole (saved) buffer
    File,
    /// Explicit 1-indexed inclusive line range
    Range { start: usize, end: usize },
}

impl ContextMode {
    /// Choices offered by the "ask" prompt, in display order
    pub const CHOICES: [&'static str; 4] =
        ["Selected Code", "Current Function", "Entire File", "Line Range"];

    /// Human label used in prompts and panel titles
    pub fn label(&self) -> &'static str {
        match self {
            ContextMode::Selection => Self::CHOICES[0],
            ContextMode::Function => Self::CHOICES[1],
            ContextMode::File => Self::CHOICES[2],
            ContextMode::Range { .. } => Self::CHOICES[3],
        }
    }

    /// True when the snippet is the real file on disk rather than a piece of it
    pub fn is_whole_file(&self) -> bool {
        matches!(self, ContextMode::File)
    }
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextMode::Range { start, end } => write!(f, "Lines {start}-{end}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Source text extracted for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub mode: ContextMode,
    pub text: String,
    pub language: Language,
    /// Filetype label of the buffer (`python`, `rust`, `text`, ...)
    pub filetype: String,
    /// Extension for a scratch file holding `text`, without the dot
    pub extension: String,
    /// Path of the buffer the snippet came from
    pub path: Option<PathBuf>,
    /// 1-indexed
    pub start_line: usize,
    /// 1-indexed, inclusive
    pub end_line: usize,
}

impl Snippet {
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}
