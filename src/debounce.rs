//! Debounced search input.
//!
//! [`ScheduledTask`] is a cancellable deferred task on the tokio runtime:
//! scheduling again cancels the pending run, and dropping it cancels too.
//! [`Debouncer`] builds on it to emit the latest pushed value once input has
//! been quiet for the configured delay.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Quiet period before a search query takes effect
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A single deferred task slot.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` after `delay`, cancelling whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Emits the most recent value after `delay` of inactivity.
///
/// Settled values arrive on the receiver returned by [`Debouncer::new`].
/// After [`Debouncer::cancel`] or drop nothing more is emitted.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    task: ScheduledTask,
    tx: mpsc::UnboundedSender<T>,
    /// Bumped on every push/cancel; a timer only emits if it is still current
    generation: Arc<AtomicU64>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            task: ScheduledTask::new(),
            tx,
            generation: Arc::new(AtomicU64::new(0)),
        };
        (debouncer, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input value and restart the quiet-period timer.
    pub fn push(&mut self, value: T) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let tx = self.tx.clone();

        debug!(generation, delay_ms = self.delay.as_millis() as u64, "Debounce timer restarted");

        self.task.schedule(self.delay, move || {
            if current.load(Ordering::SeqCst) == generation {
                // Receiver gone means the view was torn down.
                let _ = tx.send(value);
            }
        });
    }

    /// Drop any pending emission.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.task.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_pending()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
