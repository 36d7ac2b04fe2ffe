//! The ergo runtime.
//!
//! A [`Runtime`] owns a [`ProcessRegistry`]. Its cloneable [`RuntimeHandle`]
//! implements the process protocol on top of it: spawn, link, send, receive
//! and kill.

use ergo_runtime::{Completer, Completion, ExitReason, LinkError, Pid, ProcessId, ProcessRegistry};
use futures::FutureExt;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// The ergo runtime.
///
/// # Example
///
/// ```
/// use ergo_process::Runtime;
///
/// #[tokio::main]
/// async fn main() {
///     let runtime = Runtime::new();
///     let handle = runtime.handle();
///
///     let (pid, done) = handle.spawn::<(), _, _>(|_, _| async { 0 });
///     done.wait().await;
///     assert!(!handle.alive(&pid));
/// }
/// ```
pub struct Runtime {
    registry: ProcessRegistry,
}

impl Runtime {
    /// Creates a new runtime with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: ProcessRegistry::new(),
        }
    }

    /// Returns a handle to the runtime that can be cloned and shared.
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            registry: self.registry.clone(),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable handle to the runtime.
///
/// Handles can be moved into processes so they can spawn, message and kill
/// other processes. The registry behind a handle is private, so every
/// registered process is one that [`spawn`](Self::spawn) or
/// [`link`](Self::link) gave a task:
///
/// ```compile_fail
/// let runtime = ergo_process::Runtime::new();
/// let pid = runtime.handle().registry().register::<()>();
/// ```
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    registry: ProcessRegistry,
}

impl RuntimeHandle {
    /// Spawns a new process.
    ///
    /// The process is registered before this returns, whether or not `work`
    /// has started. `work` receives the process's own handle and completion
    /// and returns a status code. When it returns, or panics, the process
    /// kills itself and then resolves its completion.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<M, F, Fut>(&self, work: F) -> (Pid<M>, Completion)
    where
        M: Send + 'static,
        F: FnOnce(Pid<M>, Completion) -> Fut + Send + 'static,
        Fut: Future<Output = i32> + Send + 'static,
    {
        let pid = self.registry.register();
        self.start(pid, work)
    }

    /// Spawns a new process linked to `partner`.
    ///
    /// Killing either side later kills the other. The link is recorded before
    /// the new process is scheduled. Fails without spawning anything if
    /// `partner` is not alive.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn link<M, F, Fut>(
        &self,
        partner: impl Into<ProcessId>,
        work: F,
    ) -> Result<(Pid<M>, Completion), LinkError>
    where
        M: Send + 'static,
        F: FnOnce(Pid<M>, Completion) -> Fut + Send + 'static,
        Fut: Future<Output = i32> + Send + 'static,
    {
        let pid = self.registry.register_linked(partner.into())?;
        Ok(self.start(pid, work))
    }

    /// Schedules the task that runs a registered process.
    fn start<M, F, Fut>(&self, pid: Pid<M>, work: F) -> (Pid<M>, Completion)
    where
        M: Send + 'static,
        F: FnOnce(Pid<M>, Completion) -> Fut + Send + 'static,
        Fut: Future<Output = i32> + Send + 'static,
    {
        let (completer, completion) = Completion::new();
        let registry = self.registry.clone();
        let task_pid = pid.clone();
        let task_completion = completion.clone();

        tokio::spawn(async move {
            let id = task_pid.id();
            // Calling `work` happens inside the guarded future so a panic while
            // building the future is caught as well.
            let outcome = AssertUnwindSafe(async move { work(task_pid, task_completion).await })
                .catch_unwind()
                .await;

            let removed = registry.kill(id);
            Self::finish(id, outcome, removed, completer);
        });

        (pid, completion)
    }

    /// Resolves a finished process's completion.
    fn finish(
        pid: ProcessId,
        outcome: Result<i32, Box<dyn Any + Send>>,
        removed: bool,
        completer: Completer,
    ) {
        let reason = match outcome {
            Ok(code) if removed => ExitReason::Normal(code),
            Ok(code) => ExitReason::Killed(code),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(%pid, %message, "process panicked");
                ExitReason::Error(message)
            }
        };

        tracing::debug!(%pid, %reason, "process exited");
        completer.complete(reason);
    }

    /// Sends a message to a process.
    ///
    /// Sends to dead processes are dropped silently. Otherwise this waits
    /// until the process takes the message or dies. Delivery is best effort:
    /// a process killed concurrently may never see the message.
    pub async fn send<M: Send>(&self, pid: &Pid<M>, message: M) {
        self.registry.send(pid, message).await;
    }

    /// Waits for one message on `pid` and dispatches it to `handler`.
    ///
    /// On a message, awaits `handler(true, Some(message))` and returns `true`.
    /// If the mailbox is closed (the process was killed) the process is removed
    /// from the registry, `handler(false, None)` is awaited and `false` is
    /// returned. The handler's output is ignored.
    pub async fn receive<M, F, Fut>(&self, pid: &Pid<M>, handler: F) -> bool
    where
        M: Send,
        F: FnOnce(bool, Option<M>) -> Fut,
        Fut: Future,
    {
        match self.registry.recv(pid).await {
            Some(message) => {
                handler(true, Some(message)).await;
                true
            }
            None => {
                handler(false, None).await;
                false
            }
        }
    }

    /// Waits for the next message on `pid`.
    ///
    /// Returns `None` once the process has been killed.
    pub async fn recv<M: Send>(&self, pid: &Pid<M>) -> Option<M> {
        self.registry.recv(pid).await
    }

    /// Kills a process and everything transitively linked to it.
    ///
    /// Returns `true` iff this call performed the termination; killing a dead
    /// process returns `false` and changes nothing.
    pub fn kill(&self, pid: impl Into<ProcessId>) -> bool {
        self.registry.kill(pid.into())
    }

    /// Returns `true` if the process is alive.
    pub fn alive(&self, pid: impl Into<ProcessId>) -> bool {
        self.registry.contains(pid.into())
    }

    /// Returns a snapshot of every live process and its links.
    pub fn list_processes(&self) -> HashMap<ProcessId, HashSet<ProcessId>> {
        self.registry.snapshot()
    }
}

/// Renders a panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
