//! # Codeprompt Context
//!
//! Turns editor state into the source snippet sent along with a prompt.
//!
//! ```text
//! EditorHost
//!     │
//!     ├──> Selection      visual selection, charwise or linewise
//!     ├──> Function       tree-sitter ancestor walk
//!     │                   └─> indentation scan when no grammar/tree
//!     ├──> Line range     inclusive, 1-indexed
//!     └──> Entire file    saved buffers only
//!              │
//!              └──> Snippet { text, filetype, extension, lines }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeprompt_context::{ContextExtractor, ContextMode, ExtensionTable};
//! use codeprompt_editor::{MemoryBuffer, ScriptedHost};
//!
//! let host = ScriptedHost::new(MemoryBuffer::from_text("a\nb\nc").with_filetype("python"));
//! let table = ExtensionTable::default();
//! let extractor = ContextExtractor::new(&table);
//!
//! let snippet = extractor
//!     .extract(&host, ContextMode::Range { start: 2, end: 3 })
//!     .unwrap();
//! assert_eq!(snippet.text, "b\nc");
//! assert_eq!(snippet.extension, "py");
//! ```

mod ast_locator;
mod error;
mod extractor;
mod indent_scan;
mod language;
mod types;

pub use error::{ContextError, Result};
pub use extractor::{resolve_language, ContextExtractor};
pub use language::{ExtensionTable, Language};
pub use types::{ContextMode, Snippet};
