//! Cooperative cancellation.
//!
//! A token is the receiving end of a zero-capacity channel that nobody ever
//! sends on. Cancelling drops the only sender, which disconnects every
//! token at once; a disconnected receiver is always ready, so a token can sit
//! in a `select!` next to the node's own channel operations.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

/// Create a connected source and token.
pub fn cancel_pair() -> (CancelSource, CancelToken) {
    let (tx, rx) = channel::bounded(0);
    (CancelSource { tx: Some(tx) }, CancelToken { rx })
}

/// Owner side. Dropping it also cancels.
#[derive(Debug)]
pub struct CancelSource {
    tx: Option<Sender<()>>,
}

impl CancelSource {
    /// Fire every token created from this source. Idempotent.
    pub fn cancel(&mut self) {
        if self.tx.take().is_some() {
            tracing::debug!("cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.tx.is_none()
    }
}

/// Observer side, handed to nodes. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CancelToken {
    pub(crate) rx: Receiver<()>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Block until cancelled.
    pub fn wait(&self) {
        // nothing is ever sent, so this only returns on disconnect
        let _ = self.rx.recv();
    }
}
