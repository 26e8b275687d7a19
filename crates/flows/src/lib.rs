//! # Codeprompt Flows
//!
//! The commands a user runs, end to end:
//!
//! ```text
//! CommandSurface ──> ContextExtractor ──> TempArtifact (pieces of a file)
//!                                              │
//!                                              v
//!                                          Invoke (assistant CLI)
//!                                              │
//!                      ┌───────────────────────┴───────────┐
//!                      v                                   v
//!              ResponseRenderer               blocks::extract ──> InsertionCoordinator
//!              (ask / explain)                (generate / tests)
//! ```
//!
//! Every failure ends the flow with exactly one notification on the host;
//! [`FlowError::severity`] decides whether it is a warning or an error.

mod config;
mod error;
mod insert;
mod prompts;
mod render;
mod surface;

pub use config::{Config, WindowConfig, COMMAND_ENV};
pub use error::{FlowError, Result};
pub use insert::{
    insert_at_cursor, insert_at_end, preview_label, test_file_for, write_new_file, InsertState,
    InsertTarget, InsertionCoordinator, PreviewAction, PREVIEW_CHARS,
};
pub use render::{float_geometry, panel_title, ResponseRenderer, DISMISS_KEYS};
pub use surface::{CommandBinding, CommandId, CommandSurface};
