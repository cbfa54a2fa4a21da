//! Graceful shutdown coordination.
//!
//! The trigger latches: a listener that subscribes after `trigger` has been
//! called still observes it, so a signal racing server startup is not lost.

use std::sync::Arc;

use tokio::sync::watch;

/// Handle that fires the shutdown. Cheap to clone; every clone fires the
/// same latch.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

/// Listener side handed to the server.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the latch. Repeated calls are harmless.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once the latch has fired.
    ///
    /// If every `Shutdown` handle is dropped without firing, nothing can stop
    /// the listener any more and this never resolves.
    pub async fn recv(&mut self) {
        let closed = self.rx.wait_for(|fired| *fired).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}
