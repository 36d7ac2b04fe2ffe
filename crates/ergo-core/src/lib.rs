//! # ergo-core
//!
//! Core types for ergo, a small actor-style process runtime.
//!
//! This crate provides the plain data shared by the rest of the workspace:
//! [`ExitReason`], what a process's completion resolves to.

#![deny(warnings)]
#![deny(missing_docs)]

mod exit_reason;

pub use exit_reason::ExitReason;
