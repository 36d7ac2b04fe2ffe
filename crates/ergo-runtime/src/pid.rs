//! Process handles.
//!
//! A [`Pid`] is the only way to address a process: it carries the process's
//! [`ProcessId`] and shares ownership of its [`Mailbox`]. Handles are created
//! by the registry when a process is registered and cannot be forged.

use crate::{Mailbox, ProcessId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Handle to a process whose mailbox carries messages of type `M`.
///
/// Equality and hashing follow the process identity: two handles are equal iff
/// they refer to the same process.
pub struct Pid<M> {
    id: ProcessId,
    mailbox: Arc<Mailbox<M>>,
}

impl<M: Send> Pid<M> {
    /// Allocates a fresh identity with an open mailbox.
    pub(crate) fn new() -> Self {
        Self {
            id: ProcessId::next(),
            mailbox: Arc::new(Mailbox::new()),
        }
    }
}

impl<M> Pid<M> {
    /// Returns the process identity.
    #[inline]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub(crate) fn mailbox(&self) -> &Mailbox<M> {
        &self.mailbox
    }
}

impl<M> Clone for Pid<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}

impl<M> PartialEq for Pid<M> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<M> Eq for Pid<M> {}

impl<M> Hash for Pid<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<M> PartialEq<ProcessId> for Pid<M> {
    fn eq(&self, other: &ProcessId) -> bool {
        self.id == *other
    }
}

impl<M> From<&Pid<M>> for ProcessId {
    fn from(pid: &Pid<M>) -> Self {
        pid.id
    }
}

impl<M> fmt::Debug for Pid<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.id, f)
    }
}

impl<M> fmt::Display for Pid<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}
