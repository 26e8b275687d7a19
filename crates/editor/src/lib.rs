//! # Codeprompt Editor
//!
//! The editor surface every other codeprompt crate talks to.
//!
//! Components never reach for a global editor. They receive a
//! `&mut dyn EditorHost` and use only what the trait exposes:
//!
//! ```text
//! EditorHost
//!     ├── buffer lines      get / set (0-based, half-open)
//!     ├── cursor            get / set (1-based line, 0-based column)
//!     ├── visual selection  charwise or linewise, or none
//!     ├── floating panels   open / wait for a bound key / close
//!     ├── defer             one-shot callback on the host's loop
//!     └── user interaction  notify / input / select
//! ```
//!
//! [`MemoryBuffer`] is the line store shared by the concrete hosts, and
//! [`ScriptedHost`] answers prompts from a queue so flows can run headless.

mod buffer;
mod error;
mod host;
mod scripted;
mod types;

pub use buffer::MemoryBuffer;
pub use error::{EditorError, Result};
pub use host::EditorHost;
pub use scripted::ScriptedHost;
pub use types::{
    Border, Deferred, FloatGeometry, Key, Panel, Position, ScreenSize, Selection, SelectionKind,
    Severity, WindowId,
};
