//! Trailing-edge debouncer for recomputing suggestions while input changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Runs a job once input has been idle for `window`.
///
/// Each call cancels the pending job. The generation counter is checked
/// again after the job computes, so a job overtaken mid-computation never
/// emits a stale result.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `compute` after the idle window and hand its value to `emit`
    /// if no newer call arrived in the meantime.
    pub fn call<T, F, E>(&self, compute: F, emit: E) -> JoinHandle<()>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        E: FnOnce(T) + Send + 'static,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        {
            let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(previous) = pending.replace(cancel.clone()) {
                previous.cancel();
            }
        }

        let generation = Arc::clone(&self.generation);
        let window = self.window;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(window) => {}
            }
            let value = compute();
            if generation.load(Ordering::SeqCst) == ticket {
                emit(value);
            } else {
                tracing::trace!(ticket, "debounced result superseded");
            }
        })
    }
}
