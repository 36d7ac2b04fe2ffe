//! Process mailbox for message delivery.
//!
//! Each process has a mailbox that receives messages from other processes.
//! The mailbox is an unbuffered rendezvous channel: a send completes once a
//! receiver has taken the message, or once the mailbox is closed. Closing is
//! permanent and wakes every blocked sender and receiver.

use crate::MailboxClosed;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_util::sync::CancellationToken;

/// A message in flight, paired with the acknowledgement the receiver fires
/// when it takes the message.
struct Envelope<M> {
    message: M,
    taken: oneshot::Sender<()>,
}

/// A rendezvous mailbox carrying messages of type `M`.
///
/// Both ends live in the same value; a process handle shares it through an
/// `Arc`. Concurrent receivers are serialized, so each message is taken by
/// exactly one of them.
pub struct Mailbox<M> {
    tx: mpsc::Sender<Envelope<M>>,
    rx: Mutex<mpsc::Receiver<Envelope<M>>>,
    closed: CancellationToken,
}

impl<M: Send> Mailbox<M> {
    /// Creates a new, open mailbox.
    pub fn new() -> Self {
        // One slot holds the envelope being handed over; the sender still
        // waits for the receiver to take it.
        let (tx, rx) = mpsc::channel(1);
        Self {
            tx,
            rx: Mutex::new(rx),
            closed: CancellationToken::new(),
        }
    }

    /// Hands a message to a receiver, waiting until one takes it.
    ///
    /// Returns `Err(MailboxClosed)` if the mailbox is closed before the message
    /// is taken. The message is dropped in that case.
    pub async fn send(&self, message: M) -> Result<(), MailboxClosed> {
        if self.closed.is_cancelled() {
            return Err(MailboxClosed);
        }

        let (taken, on_taken) = oneshot::channel();
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(MailboxClosed),
            sent = self.tx.send(Envelope { message, taken }) => {
                sent.map_err(|_| MailboxClosed)?;
            }
        }

        tokio::select! {
            biased;
            ack = on_taken => ack.map_err(|_| MailboxClosed),
            _ = self.closed.cancelled() => Err(MailboxClosed),
        }
    }

    /// Receives the next message, blocking until one is sent.
    ///
    /// Returns `Err(MailboxClosed)` once the mailbox is closed, including when
    /// it closes while this call is waiting.
    pub async fn recv(&self) -> Result<M, MailboxClosed> {
        let mut rx = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(MailboxClosed),
            rx = self.rx.lock() => rx,
        };

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(MailboxClosed),
            envelope = rx.recv() => match envelope {
                Some(Envelope { message, taken }) => {
                    // The sender may have gone away; the message is still ours.
                    let _ = taken.send(());
                    Ok(message)
                }
                None => Err(MailboxClosed),
            },
        }
    }

    /// Closes the mailbox. Idempotent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Returns `true` if the mailbox is closed.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Returns a token that closes this mailbox when cancelled.
    pub(crate) fn close_token(&self) -> CancellationToken {
        self.closed.clone()
    }
}

impl<M: Send> Default for Mailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for Mailbox<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailbox")
            .field("closed", &self.closed.is_cancelled())
            .finish()
    }
}
