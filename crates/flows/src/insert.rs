use crate::config::WindowConfig;
use crate::error::{FlowError, Result};
use crate::render::{float_geometry, panel_title};
use codeprompt_blocks::CodeBlock;
use codeprompt_editor::{EditorHost, Key, Panel, Position, Severity, WindowId};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Characters of a candidate shown in the choice list
pub const PREVIEW_CHARS: usize = 50;

/// Single-line label for the candidate list.
///
/// Whitespace runs (newlines included) collapse to one space; anything past
/// [`PREVIEW_CHARS`] characters is cut and marked with `...`.
pub fn preview_label(code: &str) -> String {
    let collapsed = code.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// `dir/test_<stem>.<ext>` next to `source`
pub fn test_file_for(source: &Path, fallback_extension: &str) -> Option<PathBuf> {
    let stem = source.file_stem()?.to_str()?;
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(fallback_extension);
    Some(source.with_file_name(format!("test_{stem}.{extension}")))
}

/// Where a candidate ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertTarget {
    Cursor,
    EndOfFile,
    NewFile(PathBuf),
}

/// Progress of one insertion dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertState {
    Idle,
    AwaitingChoice,
    Previewing,
    Inserted(InsertTarget),
    Cancelled,
}

/// Single-key actions of the preview panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    InsertAtCursor,
    InsertAtEnd,
    NewFile,
    Cancel,
}

/// An open preview panel. Resolving it consumes it, so each panel yields
/// exactly one action.
struct PreviewPanel {
    window: WindowId,
    bindings: Vec<(Key, PreviewAction)>,
}

impl PreviewPanel {
    fn open(
        host: &mut dyn EditorHost,
        panel: &Panel,
        bindings: Vec<(Key, PreviewAction)>,
    ) -> Result<Self> {
        let window = host.open_panel(panel)?;
        Ok(Self { window, bindings })
    }

    /// Wait for a bound key and close the panel. Closing without a key
    /// counts as cancel.
    fn resolve(self, host: &mut dyn EditorHost) -> PreviewAction {
        let keys: Vec<Key> = self.bindings.iter().map(|(key, _)| *key).collect();
        let pressed = host.wait_for_key(self.window, &keys);
        host.close_panel(self.window);
        pressed
            .and_then(|key| {
                self.bindings
                    .iter()
                    .find(|(bound, _)| *bound == key)
                    .map(|(_, action)| *action)
            })
            .unwrap_or(PreviewAction::Cancel)
    }
}

/// Lets the user pick a generated candidate, preview it and put it somewhere
#[derive(Debug)]
pub struct InsertionCoordinator<'a> {
    window: &'a WindowConfig,
    title_prefix: &'a str,
    new_file: Option<PathBuf>,
    state: InsertState,
}

impl<'a> InsertionCoordinator<'a> {
    pub fn new(window: &'a WindowConfig, title_prefix: &'a str) -> Self {
        Self {
            window,
            title_prefix,
            new_file: None,
            state: InsertState::Idle,
        }
    }

    /// Also offer writing the candidate to `path` (`n` in the preview)
    #[must_use]
    pub fn with_new_file(mut self, path: Option<PathBuf>) -> Self {
        self.new_file = path;
        self
    }

    pub fn state(&self) -> &InsertState {
        &self.state
    }

    /// Run the dialog over `candidates`; blank candidates are skipped
    pub fn run(
        &mut self,
        host: &mut dyn EditorHost,
        prompt: &str,
        candidates: &[CodeBlock],
    ) -> Result<InsertState> {
        let candidates: Vec<&CodeBlock> = candidates.iter().filter(|b| !b.is_blank()).collect();
        if candidates.is_empty() {
            return Err(FlowError::NoCodeBlocks);
        }

        self.state = InsertState::AwaitingChoice;
        let chosen = if candidates.len() == 1 {
            candidates[0]
        } else {
            let labels: Vec<String> = candidates.iter().map(|b| preview_label(&b.code)).collect();
            let picked = host
                .select("Select code block to insert:", &labels)
                .and_then(|index| candidates.get(index).copied());
            match picked {
                Some(block) => block,
                None => return Ok(self.cancel(host)),
            }
        };

        self.state = InsertState::Previewing;
        let bindings = self.bindings();
        let panel = self.preview(host, prompt, &chosen.code, &bindings);
        let action = PreviewPanel::open(host, &panel, bindings)?.resolve(host);
        log::debug!("preview resolved to {action:?}");

        let result = match action {
            PreviewAction::InsertAtCursor => insert_at_cursor(host, &chosen.code).map(|at| {
                host.notify(&format!("Code inserted at line {}", at.line), Severity::Info);
                InsertTarget::Cursor
            }),
            PreviewAction::InsertAtEnd => insert_at_end(host, &chosen.code).map(|at| {
                host.notify(
                    &format!("Code appended at line {}", at.line),
                    Severity::Info,
                );
                InsertTarget::EndOfFile
            }),
            PreviewAction::NewFile => match self.new_file.clone() {
                Some(path) => write_new_file(&path, &chosen.code).map(|()| {
                    host.notify(&format!("Wrote {}", path.display()), Severity::Info);
                    InsertTarget::NewFile(path)
                }),
                None => return Ok(self.cancel(host)),
            },
            PreviewAction::Cancel => return Ok(self.cancel(host)),
        };

        match result {
            Ok(target) => {
                self.state = InsertState::Inserted(target);
                Ok(self.state.clone())
            }
            Err(e) => {
                self.state = InsertState::Cancelled;
                Err(e)
            }
        }
    }

    fn cancel(&mut self, host: &mut dyn EditorHost) -> InsertState {
        host.notify("Insertion cancelled", Severity::Info);
        self.state = InsertState::Cancelled;
        self.state.clone()
    }

    fn bindings(&self) -> Vec<(Key, PreviewAction)> {
        let mut bindings = vec![
            (Key::Char('i'), PreviewAction::InsertAtCursor),
            (Key::Char('a'), PreviewAction::InsertAtEnd),
        ];
        if self.new_file.is_some() {
            bindings.push((Key::Char('n'), PreviewAction::NewFile));
        }
        bindings.push((Key::Char('q'), PreviewAction::Cancel));
        bindings.push((Key::Esc, PreviewAction::Cancel));
        bindings
    }

    fn preview(
        &self,
        host: &dyn EditorHost,
        prompt: &str,
        code: &str,
        bindings: &[(Key, PreviewAction)],
    ) -> Panel {
        let mut lines = vec![format!("Prompt: {prompt}"), String::new()];
        lines.extend(code.lines().map(str::to_string));

        let hints: Vec<String> = bindings
            .iter()
            .filter(|(key, _)| *key != Key::Esc)
            .map(|(key, action)| {
                let what = match action {
                    PreviewAction::InsertAtCursor => "insert at cursor".to_string(),
                    PreviewAction::InsertAtEnd => "append to end of file".to_string(),
                    PreviewAction::NewFile => match &self.new_file {
                        Some(path) => format!("write {}", path.display()),
                        None => "new file".to_string(),
                    },
                    PreviewAction::Cancel => "cancel".to_string(),
                };
                format!("[{key}] {what}")
            })
            .collect();

        Panel {
            geometry: float_geometry(
                host.screen_size(),
                self.window,
                panel_title(self.title_prefix, "Insert Code"),
            ),
            lines,
            footer: Some(hints.join("  ")),
        }
    }
}

/// Insert `code` below the cursor line; the cursor ends on the last
/// inserted line.
pub fn insert_at_cursor(host: &mut dyn EditorHost, code: &str) -> Result<Position> {
    let lines: Vec<String> = code.lines().map(str::to_string).collect();
    let row = host.cursor().line.min(host.line_count());
    host.set_lines(row, row, &lines)?;
    let last = Position::line_start(row + lines.len().max(1));
    host.set_cursor(last)?;
    Ok(last)
}

/// Append `code` after the last line, separated by a blank line unless the
/// buffer already ends with one; the cursor ends on the first inserted line.
pub fn insert_at_end(host: &mut dyn EditorHost, code: &str) -> Result<Position> {
    let count = host.line_count();
    let ends_blank = host
        .get_lines(count.saturating_sub(1), count)
        .first()
        .map_or(true, |line| line.trim().is_empty());

    let mut lines = Vec::new();
    if !ends_blank {
        lines.push(String::new());
    }
    let first = Position::line_start(count + lines.len() + 1);
    lines.extend(code.lines().map(str::to_string));

    host.set_lines(count, count, &lines)?;
    host.set_cursor(first)?;
    Ok(first)
}

/// Create `path` with `code`; an existing file is never touched
pub fn write_new_file(path: &Path, code: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::AlreadyExists => FlowError::FileExists(path.to_path_buf()),
            _ => FlowError::Write {
                path: path.to_path_buf(),
                source,
            },
        })?;

    let mut content = code.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    file.write_all(content.as_bytes())
        .map_err(|source| FlowError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
