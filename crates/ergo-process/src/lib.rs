//! # ergo-process
//!
//! Process primitives for ergo:
//!
//! - Spawning: [`RuntimeHandle::spawn`], [`RuntimeHandle::link`]
//! - Messaging: [`RuntimeHandle::send`], [`RuntimeHandle::receive`], [`RuntimeHandle::recv`]
//! - Termination: [`RuntimeHandle::kill`]
//! - Introspection: [`RuntimeHandle::alive`], [`RuntimeHandle::list_processes`]
//!
//! The same operations are available as free functions on a process-wide
//! runtime in [`global`].
//!
//! # Example
//!
//! ```no_run
//! use ergo_process::global;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (echo, done) = global::spawn(|pid, _| async move {
//!         while let Some(line) = global::recv::<String>(&pid).await {
//!             println!("echo: {line}");
//!         }
//!         0
//!     });
//!
//!     global::send(&echo, "hello".to_string()).await;
//!     global::kill(&echo);
//!     done.wait().await;
//! }
//! ```

#![deny(warnings)]
#![deny(missing_docs)]

pub mod global;
mod runtime;

pub use runtime::{Runtime, RuntimeHandle};

// Re-export runtime types
pub use ergo_runtime::{Completion, ExitReason, LinkError, Pid, ProcessId};
