//! Integration tests for the spawn / link / send / receive / kill protocol.

use ergo_process::{ExitReason, LinkError, Pid, ProcessId, Runtime, RuntimeHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(2);

/// Spawns a process that consumes messages until it is killed.
fn spawn_idle(handle: &RuntimeHandle) -> (Pid<()>, ergo_process::Completion) {
    let process = handle.clone();
    handle.spawn(move |pid, _| async move {
        while process.recv(&pid).await.is_some() {}
        0
    })
}

#[tokio::test]
async fn spawned_process_is_listed_immediately() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let started = Arc::new(AtomicBool::new(false));
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

    let started_clone = started.clone();
    let (pid, done) = handle.spawn::<(), _, _>(move |_, _| async move {
        started_clone.store(true, Ordering::SeqCst);
        let _ = release_rx.await;
        0
    });

    let processes = handle.list_processes();
    assert!(processes.contains_key(&pid.id()));
    assert!(processes[&pid.id()].is_empty());

    release_tx.send(()).unwrap();
    timeout(WAIT, done.wait()).await.unwrap();
    assert!(started.load(Ordering::SeqCst));
}

#[tokio::test]
async fn kill_of_dead_process_is_noop() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (bystander, _bystander_done) = spawn_idle(&handle);
    let (victim, victim_done) = spawn_idle(&handle);

    assert!(handle.kill(&victim));
    timeout(WAIT, victim_done.wait()).await.unwrap();

    let before = handle.list_processes();
    assert!(!handle.kill(&victim));
    assert!(!handle.kill(victim.id()));
    assert_eq!(handle.list_processes(), before);
    assert!(handle.alive(&bystander));
}

#[tokio::test]
async fn stale_identity_never_reaches_a_new_process() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (old, old_done) = spawn_idle(&handle);
    let stale: ProcessId = old.id();
    assert!(handle.kill(stale));
    timeout(WAIT, old_done.wait()).await.unwrap();

    // Identities are only allocated by the runtime and never reused
    let (fresh, _fresh_done) = spawn_idle(&handle);
    assert_ne!(fresh.id(), stale);
    assert!(fresh.id() > stale);

    assert!(!handle.kill(stale));
    assert!(!handle.alive(stale));
    assert_eq!(
        handle.link::<(), _, _>(stale, |_, _| async { 0 }).unwrap_err(),
        LinkError::PartnerNotFound(stale)
    );
    assert!(handle.alive(&fresh));
    assert_eq!(handle.list_processes().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_kill_has_one_winner() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    for _ in 0..20 {
        let (pid, done) = spawn_idle(&handle);

        let killers: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                let pid = pid.clone();
                tokio::spawn(async move { handle.kill(&pid) })
            })
            .collect();

        let mut winners = 0;
        for killer in killers {
            if killer.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(timeout(WAIT, done.wait()).await.unwrap(), ExitReason::Killed(0));
    }

    assert!(handle.list_processes().is_empty());
}

#[tokio::test]
async fn killing_parent_kills_linked_child() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (parent, parent_done) = spawn_idle(&handle);
    let process = handle.clone();
    let (child, child_done) = handle
        .link::<(), _, _>(&parent, move |pid, _| async move {
            while process.recv(&pid).await.is_some() {}
            0
        })
        .unwrap();

    assert!(handle.list_processes()[&parent.id()].contains(&child.id()));
    assert!(handle.list_processes()[&child.id()].contains(&parent.id()));

    assert!(handle.kill(&parent));
    timeout(WAIT, parent_done.wait()).await.unwrap();
    timeout(WAIT, child_done.wait()).await.unwrap();

    assert!(!handle.alive(&parent));
    assert!(!handle.alive(&child));
}

#[tokio::test]
async fn killing_child_kills_linked_parent() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (a, a_done) = spawn_idle(&handle);
    let process = handle.clone();
    let (b, b_done) = handle
        .link::<(), _, _>(&a, move |pid, _| async move {
            while process.recv(&pid).await.is_some() {}
            0
        })
        .unwrap();

    assert!(handle.kill(&b));
    assert!(!handle.alive(&a));

    assert_eq!(timeout(WAIT, a_done.wait()).await.unwrap(), ExitReason::Killed(0));
    assert_eq!(timeout(WAIT, b_done.wait()).await.unwrap(), ExitReason::Killed(0));
    assert!(handle.list_processes().is_empty());
}

#[tokio::test]
async fn cascade_follows_transitive_links() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (root, _root_done) = spawn_idle(&handle);
    let mut tail = root.id();
    let mut completions = Vec::new();
    for _ in 0..25 {
        let process = handle.clone();
        let (pid, done) = handle
            .link::<(), _, _>(tail, move |pid, _| async move {
                while process.recv(&pid).await.is_some() {}
                0
            })
            .unwrap();
        tail = pid.id();
        completions.push(done);
    }

    let (unrelated, _unrelated_done) = spawn_idle(&handle);

    assert!(handle.kill(tail));
    for done in completions {
        timeout(WAIT, done.wait()).await.unwrap();
    }

    assert_eq!(handle.list_processes().len(), 1);
    assert!(handle.alive(&unrelated));
}

#[tokio::test]
async fn link_to_dead_partner_fails() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (partner, done) = handle.spawn::<(), _, _>(|_, _| async { 0 });
    timeout(WAIT, done.wait()).await.unwrap();

    let ran = Arc::new(AtomicBool::new(false));
    let ran_clone = ran.clone();
    let result = handle.link::<(), _, _>(&partner, move |_, _| async move {
        ran_clone.store(true, Ordering::SeqCst);
        0
    });

    assert_eq!(result.unwrap_err(), LinkError::PartnerNotFound(partner.id()));
    sleep(Duration::from_millis(20)).await;
    assert!(!ran.load(Ordering::SeqCst));
    assert!(handle.list_processes().is_empty());
}

#[tokio::test]
async fn send_to_dead_process_is_dropped() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (pid, done) = handle.spawn::<String, _, _>(|_, _| async { 0 });
    timeout(WAIT, done.wait()).await.unwrap();

    timeout(WAIT, handle.send(&pid, "anyone there?".to_string()))
        .await
        .unwrap();
    assert!(handle.list_processes().is_empty());
}

#[tokio::test]
async fn blocked_sender_released_by_kill() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    // Never receives, so a send can only complete through the kill
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let (pid, done) = handle.spawn::<u32, _, _>(move |_, _| async move {
        let _ = release_rx.await;
        0
    });

    let sender = {
        let handle = handle.clone();
        let pid = pid.clone();
        tokio::spawn(async move { handle.send(&pid, 1).await })
    };

    sleep(Duration::from_millis(20)).await;
    assert!(!sender.is_finished());

    assert!(handle.kill(&pid));
    timeout(WAIT, sender).await.unwrap().unwrap();
    assert!(!handle.alive(&pid));

    release_tx.send(()).unwrap();
    assert_eq!(timeout(WAIT, done.wait()).await.unwrap(), ExitReason::Killed(0));
}

#[tokio::test]
async fn blocked_receive_unblocks_on_kill() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let observed = Arc::new(AtomicBool::new(false));
    let observed_clone = observed.clone();
    let process = handle.clone();
    let (pid, done) = handle.spawn(move |pid: Pid<u32>, _| async move {
        let running = process
            .receive(&pid, |alive, message| {
                if !alive && message.is_none() {
                    observed_clone.store(true, Ordering::SeqCst);
                }
                async {}
            })
            .await;
        if running {
            1
        } else {
            0
        }
    });

    sleep(Duration::from_millis(20)).await;
    assert!(handle.alive(&pid));

    assert!(handle.kill(&pid));
    assert_eq!(timeout(WAIT, done.wait()).await.unwrap(), ExitReason::Killed(0));
    assert!(observed.load(Ordering::SeqCst));
    assert!(!handle.alive(&pid));
}

#[tokio::test]
async fn returning_work_cleans_itself_up() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (pid, done) = handle.spawn::<(), _, _>(|_, _| async { 0 });

    assert_eq!(timeout(WAIT, done.wait()).await.unwrap(), ExitReason::Normal(0));
    assert!(done.is_done());
    assert!(!handle.list_processes().contains_key(&pid.id()));
}

#[tokio::test]
async fn single_sender_order_is_preserved() {
    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (result_tx, result_rx) = tokio::sync::oneshot::channel();
    let process = handle.clone();
    let (pid, _done) = handle.spawn(move |pid: Pid<u32>, _| async move {
        let mut seen = Vec::new();
        while let Some(n) = process.recv(&pid).await {
            seen.push(n);
            if seen.len() == 50 {
                break;
            }
        }
        let _ = result_tx.send(seen);
        0
    });

    for n in 0..50 {
        handle.send(&pid, n).await;
    }

    let seen = timeout(WAIT, result_rx).await.unwrap().unwrap();
    assert_eq!(seen, (0..50).collect::<Vec<_>>());
}

#[tokio::test]
async fn different_message_types_can_link() {
    enum Command {
        Stop,
    }

    let runtime = Runtime::new();
    let handle = runtime.handle();

    let (text, text_done) = {
        let process = handle.clone();
        handle.spawn(move |pid: Pid<String>, _| async move {
            while process.recv(&pid).await.is_some() {}
            0
        })
    };

    let process = handle.clone();
    let (control, control_done) = handle
        .link(&text, move |pid: Pid<Command>, _| async move {
            match process.recv(&pid).await {
                Some(Command::Stop) => 1,
                None => 2,
            }
        })
        .unwrap();

    handle.send(&control, Command::Stop).await;

    // The controller returning kills it, and the link takes the text process down
    assert_eq!(timeout(WAIT, control_done.wait()).await.unwrap(), ExitReason::Normal(1));
    assert_eq!(timeout(WAIT, text_done.wait()).await.unwrap(), ExitReason::Killed(0));
}
