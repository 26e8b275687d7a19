use crate::error::{EditorError, Result};
use crate::types::{Position, Selection};
use std::path::{Path, PathBuf};

/// Line-oriented text buffer.
///
/// Like an editor buffer it never holds zero lines: an empty buffer is a
/// single empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBuffer {
    lines: Vec<String>,
    path: Option<PathBuf>,
    filetype: Option<String>,
    cursor: Position,
    selection: Option<Selection>,
    modified: bool,
    trailing_newline: bool,
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl MemoryBuffer {
    /// Scratch buffer holding `text`, cursor on the first line
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let body = body.strip_suffix('\r').unwrap_or(body);
        let lines = if text.is_empty() {
            vec![String::new()]
        } else {
            body.split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
                .collect()
        };
        Self {
            lines,
            path: None,
            filetype: None,
            cursor: Position::line_start(1),
            selection: None,
            modified: false,
            trailing_newline,
        }
    }

    /// Load a buffer from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        let mut buffer = Self::from_text(&text);
        buffer.path = Some(path.to_path_buf());
        Ok(buffer)
    }

    /// Write the buffer back to its path
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(EditorError::NoPath)?;
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        std::fs::write(&path, text).map_err(|e| EditorError::io(&path, e))?;
        self.modified = false;
        log::debug!("wrote {} lines to {}", self.lines.len(), path.display());
        Ok(())
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_filetype(mut self, filetype: impl Into<String>) -> Self {
        self.filetype = Some(filetype.into());
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: Position) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn filetype(&self) -> Option<&str> {
        self.filetype.as_deref()
    }

    pub fn set_filetype(&mut self, filetype: Option<String>) {
        self.filetype = filetype;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor; the line must exist
    pub fn set_cursor(&mut self, cursor: Position) -> Result<()> {
        if cursor.line == 0 || cursor.line > self.lines.len() {
            return Err(EditorError::InvalidCursor { line: cursor.line });
        }
        self.cursor = cursor;
        Ok(())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines `start..end` (0-indexed, end exclusive), clamped to the buffer
    pub fn get_lines(&self, start: usize, end: usize) -> Vec<String> {
        let end = end.min(self.lines.len());
        if start >= end {
            return Vec::new();
        }
        self.lines[start..end].to_vec()
    }

    /// Replace lines `start..end` (0-indexed, end exclusive) with `replacement`.
    ///
    /// `start == end` inserts before line `start`; `start == line_count()`
    /// appends.
    pub fn set_lines(&mut self, start: usize, end: usize, replacement: &[String]) -> Result<()> {
        let len = self.lines.len();
        if start > end || end > len {
            return Err(EditorError::InvalidRange { start, end, len });
        }
        self.lines
            .splice(start..end, replacement.iter().cloned())
            .for_each(drop);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.modified = true;
        Ok(())
    }

    /// Whole buffer joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
