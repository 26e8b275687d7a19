use crate::ast_locator::AstLocator;
use crate::error::{ContextError, Result};
use crate::indent_scan;
use crate::language::{ExtensionTable, Language};
use crate::types::{ContextMode, Snippet};
use codeprompt_editor::{EditorHost, Position, SelectionKind};

/// Pulls source text out of the editor for one request.
///
/// Every operation reads from the host without side effects; failures that
/// mean "nothing to send" come back as [`ContextError::is_missing_context`].
pub struct ContextExtractor<'a> {
    extensions: &'a ExtensionTable,
}

impl<'a> ContextExtractor<'a> {
    pub fn new(extensions: &'a ExtensionTable) -> Self {
        Self { extensions }
    }

    /// Dispatch on the requested mode
    pub fn extract(&self, host: &dyn EditorHost, mode: ContextMode) -> Result<Snippet> {
        match mode {
            ContextMode::Selection => self.selection(host),
            ContextMode::Function => self.enclosing_function(host, host.cursor()),
            ContextMode::File => self.entire_file(host),
            ContextMode::Range { start, end } => self.line_range(host, start, end),
        }
    }

    /// Text covered by the visual selection
    pub fn selection(&self, host: &dyn EditorHost) -> Result<Snippet> {
        let selection = host
            .visual_selection()
            .ok_or(ContextError::NoSelection)?
            .ordered();
        let (start, end) = (selection.start, selection.end);
        if start.line == 0 || start.line > host.line_count() {
            return Err(ContextError::NoSelection);
        }

        let mut lines = host.get_lines(start.line - 1, end.line);
        if selection.kind == SelectionKind::Charwise {
            let last = lines.len().saturating_sub(1);
            let end_line_covered = end.line - start.line == last;
            if let Some(line) = lines.last_mut().filter(|_| end_line_covered) {
                let cut = after_char(line, end.col);
                line.truncate(cut);
            }
            if let Some(line) = lines.first_mut() {
                let from = floor_char_boundary(line, start.col);
                line.replace_range(..from, "");
            }
        }

        let text = lines.join("\n");
        if text.is_empty() {
            return Err(ContextError::NoSelection);
        }
        let end_line = start.line + lines.len() - 1;
        Ok(self.snippet(host, ContextMode::Selection, text, start.line, end_line))
    }

    /// Source text of the function around `cursor`.
    ///
    /// Uses the syntax tree when the language has a grammar, and the
    /// indentation scan otherwise (or when parsing fails).
    pub fn enclosing_function(&self, host: &dyn EditorHost, cursor: Position) -> Result<Snippet> {
        let lines = host.all_lines();
        let (language, _) = resolve_language(host);

        if language.supports_ast() {
            let content = lines.join("\n");
            match AstLocator::new(language)
                .and_then(|mut locator| locator.enclosing_function(&content, cursor))
            {
                Ok(Some(span)) => {
                    let text = content[span.start_byte..span.end_byte].to_string();
                    return Ok(self.snippet(
                        host,
                        ContextMode::Function,
                        text,
                        span.start_line,
                        span.end_line,
                    ));
                }
                Ok(None) => return Err(ContextError::NoFunction { line: cursor.line }),
                Err(e) => {
                    log::warn!("syntax tree unavailable, falling back to indentation scan: {e}");
                }
            }
        }

        let (start, end) = indent_scan::enclosing_function(&lines, cursor.line)
            .ok_or(ContextError::NoFunction { line: cursor.line })?;
        let text = lines[start - 1..end].join("\n");
        Ok(self.snippet(host, ContextMode::Function, text, start, end))
    }

    /// Lines `start..=end` (1-indexed). An `end` past the buffer is clamped.
    pub fn line_range(&self, host: &dyn EditorHost, start: usize, end: usize) -> Result<Snippet> {
        let len = host.line_count();
        if start < 1 || end < start || start > len {
            return Err(ContextError::InvalidRange { start, end, len });
        }
        let end = end.min(len);
        let text = host.get_lines(start - 1, end).join("\n");
        Ok(self.snippet(host, ContextMode::Range { start, end }, text, start, end))
    }

    /// The whole buffer; only for buffers backed by a file
    pub fn entire_file(&self, host: &dyn EditorHost) -> Result<Snippet> {
        if host.buffer_path().is_none() {
            return Err(ContextError::NoPath);
        }
        let text = host.all_lines().join("\n");
        let end = host.line_count();
        Ok(self.snippet(host, ContextMode::File, text, 1, end))
    }

    /// Extension for a filetype label
    pub fn infer_extension(&self, label: &str) -> String {
        self.extensions.infer(label)
    }

    fn snippet(
        &self,
        host: &dyn EditorHost,
        mode: ContextMode,
        text: String,
        start_line: usize,
        end_line: usize,
    ) -> Snippet {
        let (language, label) = resolve_language(host);
        Snippet {
            mode,
            text,
            language,
            extension: self.extensions.infer(&label),
            filetype: label,
            path: host.buffer_path(),
            start_line,
            end_line,
        }
    }
}

/// Language and filetype label of the host buffer.
///
/// The host's filetype wins; otherwise the label is derived from the path.
pub fn resolve_language(host: &dyn EditorHost) -> (Language, String) {
    let from_path = host
        .buffer_path()
        .map(Language::from_path)
        .unwrap_or(Language::Unknown);

    match host.filetype().filter(|ft| !ft.trim().is_empty()) {
        Some(label) => {
            let language = match Language::from_label(&label) {
                Language::Unknown => from_path,
                known => known,
            };
            (language, label)
        }
        None if from_path != Language::Unknown => (from_path, from_path.as_str().to_string()),
        None => (Language::Unknown, "text".to_string()),
    }
}

fn floor_char_boundary(line: &str, idx: usize) -> usize {
    let mut idx = idx.min(line.len());
    while !line.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Byte index just past the character that covers `idx`
fn after_char(line: &str, idx: usize) -> usize {
    if idx >= line.len() {
        return line.len();
    }
    let start = floor_char_boundary(line, idx);
    line[start..]
        .chars()
        .next()
        .map_or(line.len(), |c| start + c.len_utf8())
}
