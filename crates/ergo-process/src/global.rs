//! Global runtime for ergo.
//!
//! A single process-wide [`Runtime`] backs the free functions in this module,
//! so processes can be spawned and messaged from anywhere without threading a
//! [`RuntimeHandle`] through. It is created on first use and lives for the
//! rest of the program.
//!
//! ```no_run
//! use ergo_process::global;
//!
//! #[tokio::main]
//! async fn main() {
//!     global::init();
//!
//!     let (pid, done) = global::spawn::<(), _, _>(|pid, _| async move {
//!         println!("hello from {pid}");
//!         0
//!     });
//!
//!     done.wait().await;
//!     assert!(!global::alive(&pid));
//! }
//! ```

use crate::{Runtime, RuntimeHandle};
use ergo_runtime::{Completion, LinkError, Pid, ProcessId};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::OnceLock;

/// Global runtime instance.
static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initializes the global runtime.
///
/// Calling this is optional, every function in this module initializes the
/// runtime on first use. Calling it multiple times is safe.
pub fn init() {
    RUNTIME.get_or_init(Runtime::new);
}

/// Returns a handle to the global runtime.
pub fn handle() -> RuntimeHandle {
    RUNTIME.get_or_init(Runtime::new).handle()
}

/// Spawns a new process on the global runtime.
///
/// See [`RuntimeHandle::spawn`].
pub fn spawn<M, F, Fut>(work: F) -> (Pid<M>, Completion)
where
    M: Send + 'static,
    F: FnOnce(Pid<M>, Completion) -> Fut + Send + 'static,
    Fut: Future<Output = i32> + Send + 'static,
{
    handle().spawn(work)
}

/// Spawns a new process linked to `partner`.
///
/// See [`RuntimeHandle::link`].
pub fn link<M, F, Fut>(
    partner: impl Into<ProcessId>,
    work: F,
) -> Result<(Pid<M>, Completion), LinkError>
where
    M: Send + 'static,
    F: FnOnce(Pid<M>, Completion) -> Fut + Send + 'static,
    Fut: Future<Output = i32> + Send + 'static,
{
    handle().link(partner, work)
}

/// Sends a message to a process. Sends to dead processes are dropped.
pub async fn send<M: Send>(pid: &Pid<M>, message: M) {
    handle().send(pid, message).await
}

/// Waits for one message on `pid` and dispatches it to `handler`.
///
/// See [`RuntimeHandle::receive`].
pub async fn receive<M, F, Fut>(pid: &Pid<M>, handler: F) -> bool
where
    M: Send,
    F: FnOnce(bool, Option<M>) -> Fut,
    Fut: Future,
{
    handle().receive(pid, handler).await
}

/// Waits for the next message on `pid`, or `None` once it has been killed.
pub async fn recv<M: Send>(pid: &Pid<M>) -> Option<M> {
    handle().recv(pid).await
}

/// Kills a process and everything linked to it.
///
/// Returns `true` iff this call performed the termination.
pub fn kill(pid: impl Into<ProcessId>) -> bool {
    handle().kill(pid)
}

/// Returns `true` if the process is alive.
pub fn alive(pid: impl Into<ProcessId>) -> bool {
    handle().alive(pid)
}

/// Returns a snapshot of every live process on the global runtime and its
/// links.
pub fn list_processes() -> HashMap<ProcessId, HashSet<ProcessId>> {
    handle().list_processes()
}
