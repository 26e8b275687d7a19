use crate::buffer::MemoryBuffer;
use crate::error::{EditorError, Result};
use crate::host::EditorHost;
use crate::types::{
    Deferred, Key, Panel, Position, ScreenSize, Scheduled, Selection, Severity, WindowId,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

/// Host whose user is a script.
///
/// Inputs, list choices and panel keys are answered from queues filled up
/// front; everything the host is asked to show is recorded for inspection.
/// An exhausted queue behaves like the user pressing escape.
#[derive(Default)]
pub struct ScriptedHost {
    pub buffer: MemoryBuffer,
    pub screen: ScreenSize,
    inputs: VecDeque<String>,
    choices: VecDeque<Option<usize>>,
    keys: VecDeque<Key>,
    notifications: Vec<(String, Severity)>,
    panels: Vec<Panel>,
    prompts: Vec<String>,
    open: Vec<WindowId>,
    next_window: u64,
    deferred: Vec<Scheduled>,
}

impl ScriptedHost {
    #[must_use]
    pub fn new(buffer: MemoryBuffer) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }

    /// Queue an answer for the next [`EditorHost::input`]
    #[must_use]
    pub fn answer(mut self, text: impl Into<String>) -> Self {
        self.inputs.push_back(text.into());
        self
    }

    /// Queue a list choice (`None` cancels the list)
    #[must_use]
    pub fn choose(mut self, index: Option<usize>) -> Self {
        self.choices.push_back(index);
        self
    }

    /// Queue a key press for the next panel
    #[must_use]
    pub fn press(mut self, key: Key) -> Self {
        self.keys.push_back(key);
        self
    }

    pub fn notifications(&self) -> &[(String, Severity)] {
        &self.notifications
    }

    /// Last notification, if any
    pub fn last_notification(&self) -> Option<&(String, Severity)> {
        self.notifications.last()
    }

    /// Every panel opened so far, in order
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Prompts shown by `input` and `select`
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Panels still open
    pub fn open_windows(&self) -> &[WindowId] {
        &self.open
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Fire every deferred callback now, ignoring the requested delays
    pub fn run_deferred(&mut self) -> usize {
        let batch = std::mem::take(&mut self.deferred);
        let fired = batch.len();
        for scheduled in batch {
            log::debug!("running deferred callback (requested delay {:?})", scheduled.delay);
            (scheduled.callback)();
        }
        fired
    }
}

impl EditorHost for ScriptedHost {
    fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    fn get_lines(&self, start: usize, end: usize) -> Vec<String> {
        self.buffer.get_lines(start, end)
    }

    fn set_lines(&mut self, start: usize, end: usize, lines: &[String]) -> Result<()> {
        self.buffer.set_lines(start, end, lines)
    }

    fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    fn set_cursor(&mut self, position: Position) -> Result<()> {
        self.buffer.set_cursor(position)
    }

    fn visual_selection(&self) -> Option<Selection> {
        self.buffer.selection()
    }

    fn buffer_path(&self) -> Option<PathBuf> {
        self.buffer.path().map(PathBuf::from)
    }

    fn filetype(&self) -> Option<String> {
        self.buffer.filetype().map(str::to_string)
    }

    fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    fn open_panel(&mut self, panel: &Panel) -> Result<WindowId> {
        if panel.geometry.width == 0 || panel.geometry.height == 0 {
            return Err(EditorError::host("panel has zero size"));
        }
        self.next_window += 1;
        let id = WindowId(self.next_window);
        self.panels.push(panel.clone());
        self.open.push(id);
        Ok(id)
    }

    fn wait_for_key(&mut self, window: WindowId, bindings: &[Key]) -> Option<Key> {
        if !self.open.contains(&window) {
            return None;
        }
        // Unbound keys are ignored, as a real panel would.
        while let Some(key) = self.keys.pop_front() {
            if bindings.contains(&key) {
                return Some(key);
            }
        }
        None
    }

    fn close_panel(&mut self, window: WindowId) {
        self.open.retain(|w| *w != window);
    }

    fn defer(&mut self, delay: Duration, callback: Deferred) {
        self.deferred.push(Scheduled { delay, callback });
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.notifications.push((message.to_string(), severity));
    }

    fn input(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.inputs.pop_front()
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Option<usize> {
        self.prompts.push(prompt.to_string());
        self.choices
            .pop_front()
            .flatten()
            .filter(|idx| *idx < items.len())
    }
}
