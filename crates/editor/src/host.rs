use crate::error::Result;
use crate::types::{Deferred, Key, Panel, Position, ScreenSize, Selection, Severity, WindowId};
use std::path::PathBuf;
use std::time::Duration;

/// Everything codeprompt needs from the editor it runs inside.
///
/// Line indices passed to [`EditorHost::get_lines`] and
/// [`EditorHost::set_lines`] are 0-based and half-open; cursor lines are
/// 1-based. Hosts must never touch user-visible registers.
pub trait EditorHost {
    fn line_count(&self) -> usize;

    /// Lines `start..end`, clamped to the buffer
    fn get_lines(&self, start: usize, end: usize) -> Vec<String>;

    /// Replace `start..end` with `lines`; `start == end` inserts
    fn set_lines(&mut self, start: usize, end: usize, lines: &[String]) -> Result<()>;

    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, position: Position) -> Result<()>;

    /// The active visual selection, if any
    fn visual_selection(&self) -> Option<Selection>;

    /// Path of the file behind the current buffer
    fn buffer_path(&self) -> Option<PathBuf>;

    /// Filetype label (`python`, `rust`, ...)
    fn filetype(&self) -> Option<String>;

    fn screen_size(&self) -> ScreenSize;

    /// Show a floating panel
    fn open_panel(&mut self, panel: &Panel) -> Result<WindowId>;

    /// Block until one of `bindings` is pressed in `window`.
    ///
    /// Returns `None` when the panel goes away without a bound key.
    fn wait_for_key(&mut self, window: WindowId, bindings: &[Key]) -> Option<Key>;

    fn close_panel(&mut self, window: WindowId);

    /// Run `callback` once on the host's loop after `delay`
    fn defer(&mut self, delay: Duration, callback: Deferred);

    fn notify(&mut self, message: &str, severity: Severity);

    /// Single-line input; `None` when the user cancels
    fn input(&mut self, prompt: &str) -> Option<String>;

    /// Single choice from `items`; `None` when the user cancels
    fn select(&mut self, prompt: &str, items: &[String]) -> Option<usize>;

    /// Every line of the buffer
    fn all_lines(&self) -> Vec<String> {
        self.get_lines(0, self.line_count())
    }
}
