//! Ping/pong between two linked processes.

use ergo_process::{global, LinkError, Pid};

/// Messages understood by both sides.
pub enum Message {
    Ping(Pid<Message>),
    Pong,
    Finished(Pid<Message>),
    Done,
}

/// Answers every `Ping` with `Pong` until `Finished` arrives.
async fn pong(pid: Pid<Message>) -> i32 {
    let mut served = 0;
    while let Some(message) = global::recv(&pid).await {
        match message {
            Message::Ping(from) => {
                tracing::info!(%pid, "pong received ping");
                served += 1;
                global::send(&from, Message::Pong).await;
            }
            Message::Finished(from) => {
                tracing::info!(%pid, "pong finished");
                global::send(&from, Message::Done).await;
                break;
            }
            Message::Pong | Message::Done => {
                tracing::warn!(%pid, "pong ignored unexpected message");
            }
        }
    }
    served
}

/// Sends `count` pings, one at a time, then tells pong it is finished.
async fn ping(pid: Pid<Message>, pong: Pid<Message>, count: usize) -> i32 {
    let mut received = 0;
    for _ in 0..count {
        global::send(&pong, Message::Ping(pid.clone())).await;
        match global::recv(&pid).await {
            Some(Message::Pong) => {
                tracing::info!(%pid, "ping received pong");
                received += 1;
            }
            Some(_) => tracing::warn!(%pid, "ping ignored unexpected message"),
            None => return received,
        }
    }

    global::send(&pong, Message::Finished(pid.clone())).await;
    if let Some(Message::Done) = global::recv(&pid).await {
        tracing::info!(%pid, "ping finished");
    }
    received
}

/// Runs one ping/pong exchange of `count` rounds and waits for both sides.
pub async fn run(count: usize) -> Result<(), LinkError> {
    let (pong_pid, pong_done) = global::spawn(|pid, _| pong(pid));

    let target = pong_pid.clone();
    let (ping_pid, ping_done) = global::link(&pong_pid, move |pid, _| ping(pid, target, count))?;

    let pong_reason = pong_done.wait().await;
    let ping_reason = ping_done.wait().await;
    tracing::info!(pid = %pong_pid, reason = %pong_reason, "pong exited");
    tracing::info!(pid = %ping_pid, reason = %ping_reason, "ping exited");

    Ok(())
}
