//! Coalescing of rapid-fire calls.
//!
//! A [`Debouncer`] delays every invocation by a fixed wait and drops it if a
//! newer one arrives first, so only the latest arguments are delivered. Typical
//! use is recomputing coverage while a station marker is being dragged.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delivers only the most recent call within each wait window.
///
/// Clones share the pending invocation. Scheduling spawns a tokio task, so
/// [`Debouncer::call`] must be made from within a tokio runtime.
///
/// # Examples
///
/// ```
/// use lineplanner_client::Debouncer;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let recompute = Debouncer::new(
///     |station_count: usize| println!("recomputing coverage for {} stations", station_count),
///     Duration::from_millis(50),
/// );
///
/// recompute.call(3);
/// recompute.call(4); // replaces the call above
/// assert!(recompute.is_pending());
/// # }
/// ```
pub struct Debouncer<A> {
    inner: Arc<DebouncerInner<A>>,
}

struct DebouncerInner<A> {
    func: Box<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A> Debouncer<A>
where
    A: Send + 'static,
{
    /// Wraps `func`. Its return value is discarded.
    pub fn new<F, R>(func: F, wait: Duration) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(DebouncerInner {
                func: Box::new(move |args| {
                    let _ = func(args);
                }),
                wait,
                pending: Mutex::new(None),
            }),
        }
    }

    /// Schedules `func(args)` after the wait, cancelling any pending invocation.
    pub fn call(&self, args: A) {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Abort under the lock so two invocations are never pending at once.
        if let Some(task) = pending.take() {
            if !task.is_finished() {
                tracing::debug!(
                    wait_ms = self.inner.wait.as_millis(),
                    "Rescheduling debounced call"
                );
            }
            task.abort();
        }

        let inner = Arc::clone(&self.inner);
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.wait).await;
            (inner.func)(args);
        }));
    }

    /// Drops the pending invocation. Returns `true` if one was pending.
    pub fn cancel(&self) -> bool {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match pending.take() {
            Some(task) => {
                let was_pending = !task.is_finished();
                task.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Returns `true` while an invocation is scheduled but has not run.
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// The delay applied to each invocation.
    pub fn wait(&self) -> Duration {
        self.inner.wait
    }
}

impl<A> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.inner.wait)
            .finish_non_exhaustive()
    }
}

/// Wraps `func` in a [`Debouncer`] and returns a plain callable.
///
/// ```
/// use lineplanner_client::debounce::debounce;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let save = debounce(|name: String| println!("saving {}", name), Duration::from_millis(100));
/// save("Line 1".to_string());
/// save("Line 12".to_string());
/// # }
/// ```
pub fn debounce<A, R, F>(func: F, wait: Duration) -> impl Fn(A)
where
    A: Send + 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    let debouncer = Debouncer::new(func, wait);
    move |args| debouncer.call(args)
}
