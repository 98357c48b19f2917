//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fan-out for the process shutdown signal.
///
/// Long-running tasks subscribe once at startup and select on the receiver
/// inside their loops. The signal fires once: from the Ctrl+C waiter in
/// production, or from a test calling [`Shutdown::trigger`] directly.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger shutdown for every subscriber.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for Ctrl+C, then trip the signal.
    ///
    /// A failure to install the handler still triggers shutdown: running
    /// without any way to stop would be worse.
    pub async fn trigger_on_ctrl_c(&self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to listen for shutdown signal");
            }
        }
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
