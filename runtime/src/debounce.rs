//! Trailing-edge debouncing and response-ordering primitives
//!
//! Search-as-you-type screens coalesce rapid input into one fetch and must
//! never let a slow earlier response overwrite a fresher one. Two small
//! primitives cover this:
//!
//! - [`Debouncer`]: trailing-edge coalescing. Each call restarts the window;
//!   only the last caller within a burst runs its closure.
//! - [`SequenceGate`]: monotonic sequence numbers. Each request takes a
//!   number; a response is applied only if no higher-numbered response has
//!   been accepted yet.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trailing-edge debouncer
///
/// Every call to [`Debouncer::call`] bumps a generation counter and sleeps
/// for the configured window. When the sleep ends, the closure runs only if
/// no later call has bumped the generation in the meantime. Superseded calls
/// return without running their closure.
///
/// # Example
///
/// ```ignore
/// let debouncer = Debouncer::new(Duration::from_millis(500));
///
/// // Rapid keystrokes: only the last one fetches
/// for term in ["a", "ab", "abc"] {
///     let d = debouncer.clone();
///     tokio::spawn(async move {
///         d.call(|| fetch(term)).await;
///     });
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Create a debouncer with the given coalescing window
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Default 500 ms window used by search inputs
    #[must_use]
    pub fn for_search() -> Self {
        Self::new(Duration::from_millis(500))
    }

    /// Schedule `f` after the window; superseded calls never run
    ///
    /// Returns `Some` with the closure's output if it ran, `None` if a later
    /// call superseded this one.
    pub async fn call<F, Fut, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.window).await;

        if self.generation.load(Ordering::SeqCst) == my_generation {
            tracing::trace!(generation = my_generation, "Debounce window elapsed, running");
            Some(f().await)
        } else {
            tracing::trace!(generation = my_generation, "Debounced call superseded");
            None
        }
    }
}

/// Monotonic sequence gate for discarding stale responses
///
/// Even with debouncing, two fetches can be in flight at once (the debounce
/// window elapsed twice before the first response landed). Each fetch takes a
/// sequence number from [`SequenceGate::next`]; when its response arrives,
/// [`SequenceGate::accept`] returns whether the response is still the newest
/// one seen. Stale responses are discarded by the caller.
///
/// # Example
///
/// ```ignore
/// let gate = SequenceGate::new();
///
/// let seq = gate.next();
/// let page = api.list_invoices(&filter).await?;
/// if gate.accept(seq) {
///     apply(page);
/// }
/// ```
#[derive(Debug, Default)]
pub struct SequenceGate {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SequenceGate {
    /// Create a gate with no requests issued
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Take the next sequence number (call before starting the request)
    pub fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Try to apply the response for `seq`
    ///
    /// Returns `true` if `seq` is newer than every previously accepted
    /// response. A `false` return means a fresher response already landed and
    /// this one must be dropped.
    pub fn accept(&self, seq: u64) -> bool {
        // CAS-max: only advance `applied`, never move it backwards
        let mut current = self.applied.load(Ordering::SeqCst);
        loop {
            if seq <= current {
                tracing::debug!(seq, current, "Discarding stale response");
                metrics::counter!("debounce.responses.discarded").increment(1);
                return false;
            }
            match self.applied.compare_exchange(
                current,
                seq,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn burst_of_calls_runs_only_the_last() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let runs = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let d = debouncer.clone();
            let runs = Arc::clone(&runs);
            handles.push(tokio::spawn(async move {
                d.call(|| async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                })
                .await
            }));
            // Keystrokes 100ms apart, well inside the 500ms window
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut ran = 0;
        for handle in handles {
            #[allow(clippy::unwrap_used)] // Test code: tasks do not panic
            if handle.await.unwrap().is_some() {
                ran += 1;
            }
        }

        assert_eq!(ran, 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn calls_outside_the_window_both_run() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let runs = Arc::clone(&runs);
            let _ = debouncer
                .call(|| async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                })
                .await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stale_response_is_discarded() {
        let gate = SequenceGate::new();
        let first = gate.next();
        let second = gate.next();

        // Second (fresher) response lands first
        assert!(gate.accept(second));
        assert!(!gate.accept(first));
    }

    #[test]
    fn in_order_responses_all_apply() {
        let gate = SequenceGate::new();
        let a = gate.next();
        let b = gate.next();

        assert!(gate.accept(a));
        assert!(gate.accept(b));
    }

    #[test]
    fn same_sequence_applies_once() {
        let gate = SequenceGate::new();
        let seq = gate.next();

        assert!(gate.accept(seq));
        assert!(!gate.accept(seq));
    }
}
