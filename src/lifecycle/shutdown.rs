//! Shutdown coordination for the bouncer.

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// Backed by a watch channel holding "are we stopping": tasks that start
/// watching after the trigger still observe the shutdown.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Hand out a watcher for a long-running task.
    pub fn watcher(&self) -> Watcher {
        Watcher {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal every watcher to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One task's view of the shutdown signal.
pub struct Watcher {
    rx: watch::Receiver<bool>,
}

impl Watcher {
    /// Wait until shutdown is triggered. Returns immediately if it already
    /// was.
    pub async fn wait(&mut self) {
        // An error means the coordinator is gone, which also means stop.
        let _ = self.rx.wait_for(|stopping| *stopping).await;
    }
}
