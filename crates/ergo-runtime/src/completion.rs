//! Completion signals.
//!
//! Every process owns a [`Completion`] that resolves exactly once, after the
//! process's work has returned and the process has been removed from the
//! registry. Any number of parties may wait on it.

use ergo_core::ExitReason;
use tokio::sync::watch;

/// Waitable signal that resolves to a process's [`ExitReason`].
///
/// Cheap to clone; all clones observe the same resolution.
#[derive(Clone)]
pub struct Completion {
    rx: watch::Receiver<Option<ExitReason>>,
}

/// The resolving side of a [`Completion`].
///
/// Consumed by [`Completer::complete`], so a completion can only be resolved
/// once.
pub struct Completer {
    tx: watch::Sender<Option<ExitReason>>,
}

impl Completion {
    /// Creates an unresolved completion and the completer that resolves it.
    pub fn new() -> (Completer, Completion) {
        let (tx, rx) = watch::channel(None);
        (Completer { tx }, Completion { rx })
    }

    /// Waits until the process has finished and returns why it exited.
    ///
    /// If the process task was dropped without finishing (for example because
    /// the tokio runtime shut down) this resolves to an [`ExitReason::Error`].
    pub async fn wait(&self) -> ExitReason {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(Option::is_some).await;
        let reason = rx.borrow().clone();
        reason.unwrap_or_else(|| ExitReason::error("process dropped before completing"))
    }

    /// Returns `true` if the process has finished.
    pub fn is_done(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Returns the exit reason if the process has finished.
    pub fn reason(&self) -> Option<ExitReason> {
        self.rx.borrow().clone()
    }
}

impl Completer {
    /// Resolves the completion, waking every waiter.
    pub fn complete(self, reason: ExitReason) {
        self.tx.send_replace(Some(reason));
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("reason", &self.reason())
            .finish()
    }
}
