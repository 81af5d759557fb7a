use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::info;

/// Cooperative stop flag for one run.
///
/// Checked before provider work, raced against the provider call and checked
/// before each scene is committed.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`StopSignal::stop`] has been called.
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

/// Keeps at most one run active; starting a run stops the previous one.
#[derive(Debug, Default)]
pub struct RunController {
    active: Mutex<Option<StopSignal>>,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the signal for a new run, superseding any active run.
    pub fn begin(&self) -> StopSignal {
        let signal = StopSignal::new();
        let previous = self.slot().replace(signal.clone());
        if let Some(previous) = previous {
            if !previous.is_stopped() {
                info!("new run supersedes the active run");
                previous.stop();
            }
        }
        signal
    }

    /// User-initiated stop of the active run, if any.
    pub fn stop(&self) {
        if let Some(active) = self.slot().as_ref() {
            active.stop();
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<StopSignal>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn signal_starts_running() {
        let signal = StopSignal::new();
        assert!(!signal.is_stopped());
        signal.clone().stop();
        assert!(signal.is_stopped());
    }

    #[tokio::test]
    async fn stopped_resolves_after_stop() {
        let signal = StopSignal::new();
        let waiter = signal.clone();
        let handle = tokio::spawn(async move { waiter.stopped().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.stop();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("stopped() should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn stopped_resolves_when_already_stopped() {
        let signal = StopSignal::new();
        signal.stop();
        tokio::time::timeout(Duration::from_secs(1), signal.stopped())
            .await
            .expect("already stopped");
    }

    #[test]
    fn new_run_supersedes_previous() {
        let controller = RunController::new();
        let first = controller.begin();
        let second = controller.begin();
        assert!(first.is_stopped());
        assert!(!second.is_stopped());

        controller.stop();
        assert!(second.is_stopped());
    }
}
