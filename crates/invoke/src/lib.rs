//! # Codeprompt Invoke
//!
//! The two pieces of codeprompt that touch the operating system:
//!
//! - [`TempArtifactManager`] materialises a snippet as a uniquely named
//!   scratch file and guarantees it is removed, either as soon as the
//!   consumer releases it or after a bounded timeout.
//! - [`CommandInvoker`] runs the external assistant with an argument vector
//!   (never a shell string), feeds optional content through stdin, and
//!   captures stdout and stderr as one text.
//!
//! Flows depend on the [`Invoke`] trait, not on the concrete invoker.

mod error;
mod invoker;
mod temp;

pub use error::{InvokeError, Result};
pub use invoker::{
    escape_double_quotes, fence, CommandInvoker, CommandLine, ContentDelivery, InvocationResult,
    Invoke, InvokerConfig, Outcome,
};
pub use temp::{schedule_delete, ReleaseHandle, TempArtifact, TempArtifactManager};
