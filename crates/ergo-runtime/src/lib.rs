//! # ergo-runtime
//!
//! Runtime infrastructure for ergo.
//!
//! This crate provides the core runtime components:
//!
//! - [`ProcessRegistry`] - The single table of live processes and their links
//! - [`Mailbox`] - Unbuffered rendezvous channel owned by a process
//! - [`Pid`] - Opaque process handle bundling identity and mailbox
//! - [`ProcessId`] - Copyable process identity, allocated only by the registry
//! - [`Completion`] - One-shot signal resolved when a process finishes

#![deny(warnings)]
#![deny(missing_docs)]

mod completion;
mod error;
mod mailbox;
mod pid;
mod process_id;
mod registry;

pub use completion::{Completer, Completion};
pub use error::{LinkError, MailboxClosed};
pub use mailbox::Mailbox;
pub use pid::Pid;
pub use process_id::ProcessId;
pub use registry::ProcessRegistry;

// Re-export core types for convenience
pub use ergo_core::ExitReason;
