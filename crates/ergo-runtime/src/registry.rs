//! Process registry.
//!
//! The [`ProcessRegistry`] is the single source of truth for which processes
//! are alive and how they are linked. Every lifecycle transition (register,
//! link, kill) happens under one lock; a check for liveness and the mutation
//! that depends on it always share the same critical section.

use crate::{LinkError, Pid, ProcessId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Registry bookkeeping for one live process.
struct Entry {
    /// Processes linked to this one. Links are stored on both sides.
    links: HashSet<ProcessId>,
    /// Closes the process's mailbox.
    close: CancellationToken,
}

impl Entry {
    fn new<M>(pid: &Pid<M>) -> Self
    where
        M: Send,
    {
        Self {
            links: HashSet::new(),
            close: pid.mailbox().close_token(),
        }
    }
}

/// A thread-safe registry of all live processes.
///
/// Cloning the registry yields another handle to the same table.
///
/// # Examples
///
/// ```
/// use ergo_runtime::ProcessRegistry;
///
/// let registry = ProcessRegistry::new();
/// let pid = registry.register::<String>();
///
/// assert!(registry.contains(pid.id()));
/// assert!(registry.kill(pid.id()));
/// assert!(!registry.kill(pid.id()));
/// assert!(registry.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct ProcessRegistry {
    processes: Arc<Mutex<HashMap<ProcessId, Entry>>>,
}

impl ProcessRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new process handle and registers it with no links.
    pub fn register<M: Send>(&self) -> Pid<M> {
        let pid = Pid::new();
        self.processes.lock().insert(pid.id(), Entry::new(&pid));
        tracing::debug!(pid = %pid, "process registered");
        pid
    }

    /// Allocates a new process handle, registers it and links it to `partner`.
    ///
    /// The liveness check on `partner`, the insertion and both sides of the
    /// link happen in a single critical section. Nothing is registered if the
    /// partner is not alive.
    pub fn register_linked<M: Send>(&self, partner: ProcessId) -> Result<Pid<M>, LinkError> {
        let mut processes = self.processes.lock();

        let Some(partner_entry) = processes.get_mut(&partner) else {
            return Err(LinkError::PartnerNotFound(partner));
        };

        let pid = Pid::new();
        partner_entry.links.insert(pid.id());

        let mut entry = Entry::new(&pid);
        entry.links.insert(partner);
        processes.insert(pid.id(), entry);
        drop(processes);

        tracing::debug!(pid = %pid, %partner, "process registered and linked");
        Ok(pid)
    }

    /// Kills a process and everything transitively linked to it.
    ///
    /// Removal of `pid` (capturing its links and closing its mailbox) is
    /// atomic, so among concurrent callers exactly one observes `true`. The
    /// cascade over linked processes runs after the lock is released; each
    /// linked process is removed in its own critical section and is visited at
    /// most once.
    ///
    /// Returns `true` iff this call removed `pid`.
    pub fn kill(&self, pid: ProcessId) -> bool {
        let Some(mut pending) = self.remove(pid) else {
            tracing::trace!(%pid, "kill ignored, process not alive");
            return false;
        };
        tracing::debug!(%pid, links = pending.len(), "process killed");

        while let Some(linked) = pending.pop() {
            if let Some(links) = self.remove(linked) {
                tracing::debug!(pid = %linked, via = %pid, "linked process killed");
                pending.extend(links);
            }
        }

        true
    }

    /// Removes a process and closes its mailbox, returning its links.
    fn remove(&self, pid: ProcessId) -> Option<Vec<ProcessId>> {
        let mut processes = self.processes.lock();
        let entry = processes.remove(&pid)?;
        entry.close.cancel();
        Some(entry.links.into_iter().collect())
    }

    /// Delivers a message to a live process.
    ///
    /// Sends to a process that is not registered are dropped silently. The
    /// liveness check is not atomic with delivery: if the process is killed
    /// after the check the message is dropped as well, and the sender is
    /// released. Delivery is best effort, never an error.
    pub async fn send<M: Send>(&self, pid: &Pid<M>, message: M) {
        if !self.contains(pid.id()) {
            tracing::trace!(pid = %pid, "send to dead process dropped");
            return;
        }

        if pid.mailbox().send(message).await.is_err() {
            tracing::trace!(pid = %pid, "process died before taking message");
        }
    }

    /// Waits for the next message addressed to `pid`.
    ///
    /// Returns `None` once the mailbox is closed. In that case the process is
    /// killed (a no-op if it was already removed) before returning.
    pub async fn recv<M: Send>(&self, pid: &Pid<M>) -> Option<M> {
        match pid.mailbox().recv().await {
            Ok(message) => Some(message),
            Err(_) => {
                self.kill(pid.id());
                None
            }
        }
    }

    /// Returns `true` if a process with the given id is alive.
    pub fn contains(&self, pid: ProcessId) -> bool {
        self.processes.lock().contains_key(&pid)
    }

    /// Returns the processes linked to `pid`, or `None` if it is not alive.
    pub fn links(&self, pid: ProcessId) -> Option<Vec<ProcessId>> {
        self.processes
            .lock()
            .get(&pid)
            .map(|entry| entry.links.iter().copied().collect())
    }

    /// Returns the number of live processes.
    pub fn len(&self) -> usize {
        self.processes.lock().len()
    }

    /// Returns `true` if no process is alive.
    pub fn is_empty(&self) -> bool {
        self.processes.lock().is_empty()
    }

    /// Returns the ids of all live processes.
    pub fn pids(&self) -> Vec<ProcessId> {
        self.processes.lock().keys().copied().collect()
    }

    /// Returns a point-in-time copy of the registry: every live process and
    /// the set of processes linked to it.
    pub fn snapshot(&self) -> HashMap<ProcessId, HashSet<ProcessId>> {
        self.processes
            .lock()
            .iter()
            .map(|(pid, entry)| (*pid, entry.links.clone()))
            .collect()
    }
}

impl std::fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("process_count", &self.len())
            .finish()
    }
}
