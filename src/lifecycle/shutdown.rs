//! Shutdown coordination.
//!
//! The signal handler and the HTTP server share one `Shutdown`; tests
//! trigger it directly to stop a server bound to an ephemeral port.

use tokio::sync::broadcast;

/// Broadcast fired once when the emporium should stop serving.
///
/// `HttpServer::run` subscribes before serving and drains in-flight
/// requests after the first message.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
