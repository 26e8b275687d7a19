use codeprompt_editor::{
    Border, Deferred, EditorError, EditorHost, Key, MemoryBuffer, Panel, Position, ScreenSize,
    Selection, Severity, WindowId,
};
use console::{measure_text_width, pad_str, style, truncate_str, Alignment, Term};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

/// [`EditorHost`] for a shell session over one file.
///
/// Panels are drawn on stdout (boxed when it is a terminal, plain text
/// otherwise), notifications go to stderr, prompts use `dialoguer`. Answers
/// given on the command line are consumed before asking interactively.
pub struct TerminalHost {
    buffer: MemoryBuffer,
    out: Term,
    err: Term,
    inputs: VecDeque<String>,
    choices: VecDeque<usize>,
    keys: VecDeque<Key>,
    drawn: HashMap<WindowId, usize>,
    next_window: u64,
    deferred: Vec<(Instant, Deferred)>,
}

impl TerminalHost {
    pub fn new(buffer: MemoryBuffer) -> Self {
        Self {
            buffer,
            out: Term::stdout(),
            err: Term::stderr(),
            inputs: VecDeque::new(),
            choices: VecDeque::new(),
            keys: VecDeque::new(),
            drawn: HashMap::new(),
            next_window: 0,
            deferred: Vec::new(),
        }
    }

    pub fn preset_input(&mut self, text: impl Into<String>) {
        self.inputs.push_back(text.into());
    }

    pub fn preset_choice(&mut self, index: usize) {
        self.choices.push_back(index);
    }

    pub fn preset_key(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    /// Run outstanding deferred work (waiting out its delay) and hand the
    /// buffer back
    pub fn finish(mut self) -> MemoryBuffer {
        let mut pending = std::mem::take(&mut self.deferred);
        pending.sort_by_key(|(due, _)| *due);
        for (due, callback) in pending {
            let wait = due.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
            callback();
        }
        self.buffer
    }

    fn interactive(&self) -> bool {
        self.out.is_term() && self.err.is_term()
    }

    fn draw(&self, panel: &Panel) -> std::io::Result<usize> {
        let geometry = &panel.geometry;
        if !self.out.is_term() {
            self.out.write_line(&geometry.title)?;
            for line in &panel.lines {
                self.out.write_line(line)?;
            }
            return Ok(panel.lines.len() + 1);
        }

        let frame = Frame::for_border(geometry.border);
        let inner = geometry.width.saturating_sub(2).max(1);
        let indent = " ".repeat(geometry.col);

        let mut rows = Vec::new();
        let label = format!(" {} ", geometry.title);
        let label = truncate_str(&label, inner, "…");
        let fill = inner.saturating_sub(measure_text_width(&label));
        rows.push(format!(
            "{indent}{}{label}{}{}",
            frame.top_left,
            frame.horizontal.repeat(fill),
            frame.top_right
        ));

        let mut body: Vec<String> = panel.lines.iter().flat_map(|l| wrap(l, inner)).collect();
        let min_body = geometry.height.saturating_sub(2);
        while body.len() < min_body {
            body.push(String::new());
        }
        for line in body {
            let padded = pad_str(&line, inner, Alignment::Left, None);
            rows.push(format!("{indent}{}{padded}{}", frame.vertical, frame.vertical));
        }

        rows.push(format!(
            "{indent}{}{}{}",
            frame.bottom_left,
            frame.horizontal.repeat(inner),
            frame.bottom_right
        ));
        if let Some(footer) = &panel.footer {
            rows.push(format!("{indent}{}", style(footer).dim()));
        }

        for row in &rows {
            self.out.write_line(row)?;
        }
        Ok(rows.len())
    }
}

/// Box-drawing characters of a border style
struct Frame {
    top_left: &'static str,
    top_right: &'static str,
    bottom_left: &'static str,
    bottom_right: &'static str,
    horizontal: &'static str,
    vertical: &'static str,
}

impl Frame {
    fn for_border(border: Border) -> Self {
        let (top_left, top_right, bottom_left, bottom_right, horizontal, vertical) = match border {
            Border::None => (" ", " ", " ", " ", " ", " "),
            Border::Single => ("┌", "┐", "└", "┘", "─", "│"),
            Border::Double => ("╔", "╗", "╚", "╝", "═", "║"),
            Border::Rounded => ("╭", "╮", "╰", "╯", "─", "│"),
        };
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            horizontal,
            vertical,
        }
    }
}

/// Split `line` into pieces of at most `width` characters
fn wrap(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.replace('\t', "    ").chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn key_from_console(key: console::Key) -> Option<Key> {
    match key {
        console::Key::Char(c) => Some(Key::Char(c)),
        console::Key::Escape => Some(Key::Esc),
        console::Key::Enter => Some(Key::Enter),
        _ => None,
    }
}

impl EditorHost for TerminalHost {
    fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    fn get_lines(&self, start: usize, end: usize) -> Vec<String> {
        self.buffer.get_lines(start, end)
    }

    fn set_lines(
        &mut self,
        start: usize,
        end: usize,
        lines: &[String],
    ) -> codeprompt_editor::Result<()> {
        self.buffer.set_lines(start, end, lines)
    }

    fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    fn set_cursor(&mut self, position: Position) -> codeprompt_editor::Result<()> {
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
        let (rows, cols) = self.out.size();
        ScreenSize {
            cols: cols as usize,
            rows: rows as usize,
        }
    }

    fn open_panel(&mut self, panel: &Panel) -> codeprompt_editor::Result<WindowId> {
        let rows = self
            .draw(panel)
            .map_err(|e| EditorError::host(format!("cannot draw panel: {e}")))?;
        self.next_window += 1;
        let window = WindowId(self.next_window);
        self.drawn.insert(window, rows);
        Ok(window)
    }

    fn wait_for_key(&mut self, window: WindowId, bindings: &[Key]) -> Option<Key> {
        if !self.drawn.contains_key(&window) {
            return None;
        }
        while let Some(key) = self.keys.pop_front() {
            if bindings.contains(&key) {
                return Some(key);
            }
        }
        if !self.interactive() {
            log::debug!("no terminal to read keys from; closing panel");
            return None;
        }
        loop {
            match self.out.read_key() {
                Ok(key) => match key_from_console(key) {
                    Some(key) if bindings.contains(&key) => return Some(key),
                    _ => continue,
                },
                Err(e) => {
                    log::warn!("failed to read key: {e}");
                    return None;
                }
            }
        }
    }

    fn close_panel(&mut self, window: WindowId) {
        if let Some(rows) = self.drawn.remove(&window) {
            if self.interactive() {
                if let Err(e) = self.out.clear_last_lines(rows) {
                    log::debug!("could not clear panel: {e}");
                }
            }
        }
    }

    fn defer(&mut self, delay: Duration, callback: Deferred) {
        self.deferred.push((Instant::now() + delay, callback));
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        let label = match severity {
            Severity::Info => style("info").cyan(),
            Severity::Warn => style("warning").yellow(),
            Severity::Error => style("error").red().bold(),
        }
        .for_stderr();
        if let Err(e) = self.err.write_line(&format!("{label}: {message}")) {
            log::error!("{message} ({e})");
        }
    }

    fn input(&mut self, prompt: &str) -> Option<String> {
        if let Some(text) = self.inputs.pop_front() {
            return Some(text);
        }
        if !self.interactive() {
            log::debug!("no terminal for `{prompt}`");
            return None;
        }
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.trim_end_matches([':', ' ']))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| log::warn!("input failed: {e}"))
            .ok()
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Option<usize> {
        if let Some(index) = self.choices.pop_front() {
            return Some(index).filter(|i| *i < items.len());
        }
        if !self.interactive() {
            log::debug!("no terminal for `{prompt}`");
            return None;
        }
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.trim_end_matches([':', ' ']))
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(|e| log::warn!("selection failed: {e}"))
            .ok()
            .flatten()
    }
}
