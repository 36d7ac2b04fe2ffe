//! Process identity type.
//!
//! A [`ProcessId`] names a process in the registry. It is the copyable part of a
//! process handle: links, kill cascades and registry snapshots are all keyed by
//! it. Identities come from a process-wide counter owned by this crate and are
//! never reused.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique process identities.
static PID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A process identity.
///
/// Two `ProcessId`s are equal iff they name the same process. A fresh identity
/// is allocated for every registered process, so an identity is never shared by
/// two processes, even after the first one has terminated.
///
/// Identities are only handed out by the registry, through [`Pid::id`] or the
/// registry's snapshots. They serialize for diagnostics but cannot be parsed
/// back or built from a number:
///
/// ```compile_fail
/// use ergo_runtime::ProcessId;
///
/// let forged: ProcessId = serde_json::from_str("1").unwrap();
/// ```
///
/// ```compile_fail
/// use ergo_runtime::ProcessId;
///
/// let forged = ProcessId::next();
/// ```
///
/// [`Pid::id`]: crate::Pid::id
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProcessId(u64);

impl ProcessId {
    /// Allocates a new, never before seen process identity.
    pub(crate) fn next() -> Self {
        Self(PID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the numeric identity.
    #[inline]
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pid<{}>", self.0)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}
