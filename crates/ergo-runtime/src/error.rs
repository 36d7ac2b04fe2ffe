//! Error types for runtime operations.

use crate::ProcessId;
use thiserror::Error;

/// Errors that can occur when linking a new process to a partner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The partner process is not alive.
    #[error("partner process not found: {0}")]
    PartnerNotFound(ProcessId),
}

/// The mailbox was closed because its process was killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("mailbox closed")]
pub struct MailboxClosed;
