//! Process exit reasons.
//!
//! An [`ExitReason`] is what a process's completion signal resolves to. It
//! records the status code returned by the process's work and whether the
//! process terminated itself or was killed by someone else first.

use std::fmt;

/// The reason a process exited.
///
/// # Examples
///
/// ```
/// use ergo_core::ExitReason;
///
/// let reason = ExitReason::Normal(0);
/// assert!(reason.is_normal());
/// assert_eq!(reason.code(), Some(0));
///
/// let reason = ExitReason::error("index out of bounds");
/// assert!(!reason.is_normal());
/// assert_eq!(reason.code(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// The work returned with the given status code and the process removed
    /// itself from the registry.
    Normal(i32),

    /// The work returned with the given status code, but the process had
    /// already been killed (explicitly or through a link) by then.
    Killed(i32),

    /// The work panicked. The process was still cleaned up.
    Error(String),
}

impl ExitReason {
    /// Returns `true` if the process finished on its own.
    pub fn is_normal(&self) -> bool {
        matches!(self, ExitReason::Normal(_))
    }

    /// Returns `true` if the process was killed before its work returned.
    #[inline]
    pub fn is_killed(&self) -> bool {
        matches!(self, ExitReason::Killed(_))
    }

    /// Returns the status code returned by the work, if it returned at all.
    pub fn code(&self) -> Option<i32> {
        match self {
            ExitReason::Normal(code) | ExitReason::Killed(code) => Some(*code),
            ExitReason::Error(_) => None,
        }
    }

    /// Creates an error exit reason from any displayable type.
    pub fn error(msg: impl fmt::Display) -> Self {
        ExitReason::Error(msg.to_string())
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Normal(code) => write!(f, "normal ({})", code),
            ExitReason::Killed(code) => write!(f, "killed ({})", code),
            ExitReason::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}
