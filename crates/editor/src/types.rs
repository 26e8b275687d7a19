use std::fmt;
use std::time::Duration;

/// A cursor or selection endpoint.
///
/// `line` is 1-indexed (as editors display it), `col` is a 0-indexed byte
/// offset into that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Start of the given line
    #[must_use]
    pub const fn line_start(line: usize) -> Self {
        Self { line, col: 0 }
    }
}

/// How the visual selection was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Character-wise (`v`): columns matter, end column is inclusive
    Charwise,
    /// Line-wise (`V`): whole lines, columns ignored
    Linewise,
}

/// A visual selection. `start` is always at or before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    pub kind: SelectionKind,
}

impl Selection {
    /// Build a selection, ordering the endpoints
    #[must_use]
    pub fn new(a: Position, b: Position, kind: SelectionKind) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self { start, end, kind }
    }

    /// The same selection with `start` at or before `end`
    #[must_use]
    pub fn ordered(self) -> Self {
        Self::new(self.start, self.end, self.kind)
    }

    /// Line-wise selection of `start..=end` (1-indexed)
    #[must_use]
    pub fn lines(start: usize, end: usize) -> Self {
        Self::new(
            Position::line_start(start),
            Position::line_start(end),
            SelectionKind::Linewise,
        )
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        })
    }
}

/// Floating window border style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    None,
    Single,
    Double,
    #[default]
    Rounded,
}

impl Border {
    /// Parse a border name as written in configuration
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Border::None),
            "single" => Some(Border::Single),
            "double" => Some(Border::Double),
            "rounded" => Some(Border::Rounded),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Border::None => "none",
            Border::Single => "single",
            Border::Double => "double",
            Border::Rounded => "rounded",
        }
    }
}

/// Geometry of a floating panel, in screen cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatGeometry {
    pub width: usize,
    pub height: usize,
    pub row: usize,
    pub col: usize,
    pub border: Border,
    pub title: String,
}

/// Content of a floating panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub geometry: FloatGeometry,
    pub lines: Vec<String>,
    /// One-line hint listing the panel's key bindings
    pub footer: Option<String>,
}

/// Handle to an open panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// A single key a panel can bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Esc,
    Enter,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Esc => f.write_str("<Esc>"),
            Key::Enter => f.write_str("<CR>"),
        }
    }
}

/// Editor screen dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub cols: usize,
    pub rows: usize,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self { cols: 120, rows: 40 }
    }
}

/// Callback queued with [`crate::EditorHost::defer`]
pub type Deferred = Box<dyn FnOnce() + Send + 'static>;

/// Convenience for hosts that keep deferred work in a queue
pub(crate) struct Scheduled {
    pub delay: Duration,
    pub callback: Deferred,
}
