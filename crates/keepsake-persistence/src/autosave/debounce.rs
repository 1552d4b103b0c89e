//! A restartable one-shot timer.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Runs an action once the timer has gone `delay` without being rescheduled.
///
/// Only the timer is cancelled on reschedule or drop. Once it fires, the
/// action runs as its own task and is never aborted.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    runtime: Option<Handle>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Timers are spawned on the runtime current at the time of the call to
    /// [`schedule`](Self::schedule), falling back to the one current here.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            runtime: Handle::try_current().ok(),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the timer; `action` replaces any action still waiting.
    ///
    /// Returns false (and drops `action`) when there is no runtime to run
    /// the timer on.
    pub fn schedule<F, Fut>(&self, action: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Some(runtime) = Handle::try_current().ok().or_else(|| self.runtime.clone()) else {
            tracing::warn!("no async runtime available; autosave skipped");
            return false;
        };
        let delay = self.delay;
        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action());
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
        true
    }

    /// Stop a waiting timer. Returns whether one was waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.get_mut().take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bump(counter: &Arc<AtomicUsize>) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(3000));
        for _ in 0..5 {
            assert!(debouncer.schedule(bump(&fired)));
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_run() {
        let fired = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(3000));
        for _ in 0..3 {
            debouncer.schedule(bump(&fired));
            tokio::time::sleep(Duration::from_millis(3500)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_stop_the_timer() {
        let fired = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.schedule(bump(&fired));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        debouncer.schedule(bump(&fired));
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
