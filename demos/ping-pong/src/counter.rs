//! A counter process fed by a client process.

use ergo_process::{global, LinkError, Pid};

pub enum Command {
    Add(i64),
    Get(Pid<i64>),
}

async fn counter(pid: Pid<Command>) -> i32 {
    let mut total = 0;
    while global::receive(&pid, |alive, command| {
        let reply = match command {
            Some(Command::Add(n)) => {
                total += n;
                None
            }
            Some(Command::Get(from)) => Some((from, total)),
            None => {
                tracing::debug!(%pid, alive, "counter stopped");
                None
            }
        };
        async move {
            if let Some((from, total)) = reply {
                global::send(&from, total).await;
            }
        }
    })
    .await
    {}
    0
}

/// Adds `1..=count` to a fresh counter and reports the total.
pub async fn run(count: i64) -> Result<(), LinkError> {
    let (counter_pid, counter_done) = global::spawn(|pid, _| counter(pid));

    let target = counter_pid.clone();
    let (_client, client_done) = global::link(&counter_pid, move |pid: Pid<i64>, _| async move {
        for n in 1..=count {
            global::send(&target, Command::Add(n)).await;
        }
        global::send(&target, Command::Get(pid.clone())).await;
        match global::recv(&pid).await {
            Some(total) => {
                tracing::info!(total, "counter reported");
                0
            }
            None => 1,
        }
    })?;

    // The client returning takes the counter down through the link
    let client_reason = client_done.wait().await;
    let counter_reason = counter_done.wait().await;
    tracing::info!(client = %client_reason, counter = %counter_reason, "counter demo done");

    Ok(())
}
