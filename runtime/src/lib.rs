//! # rentflow Runtime
//!
//! Runtime implementation for the rentflow composable client architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Debounce**: trailing-edge coalescing and sequence-gated response ordering
//!
//! ## Example
//!
//! ```ignore
//! use rentflow_runtime::Store;
//! use rentflow_core::reducer::Reducer;
//!
//! let store = Store::new(
//!     initial_state,
//!     my_reducer,
//!     environment,
//! );
//!
//! // Send an action
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use rentflow_core::effect::{Effect, EffectKey};
use rentflow_core::reducer::Reducer;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};
use tokio::task::AbortHandle;

/// Debounce and response-ordering primitives
pub mod debounce;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The store is shutting down and rejected the action
        #[error("store is shutting down, action rejected")]
        ShutdownInProgress,

        /// Graceful shutdown timed out with effects still running
        #[error("shutdown timeout: {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timed out waiting for a matching result action
        #[error("timed out waiting for result action")]
        Timeout,

        /// The action broadcast channel closed while waiting
        #[error("action channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default().with_broadcast_capacity(256);
///
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action to complete. Feedback actions produced by effects create their
/// own handles; use [`Store::send_and_wait_for`] to observe a cascade's
/// terminal action instead.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All direct effects from Action::Start are now complete
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle together with its tracking side
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all directly-started effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is decremented even if the effect panics or the task
/// is aborted mid-flight.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (workflow logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop and per-key cancellation)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(
///     BookingState::default(),
///     BookingReducer,
///     production_environment(),
/// );
///
/// store.send(BookingAction::ContinueToEquipment).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// All actions produced by effects (e.g., from `Effect::Future`) are
    /// broadcast to observers. This enables request-response patterns
    /// (`send_and_wait_for`) without polling state.
    action_broadcast: broadcast::Sender<A>,
    /// In-flight abort handles for cancellable effects, keyed by effect key.
    ///
    /// Keys are static strings; a superseded entry is overwritten on the next
    /// schedule, so the map stays bounded by the number of distinct keys.
    cancellations: Arc<Mutex<HashMap<EffectKey, AbortHandle>>>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Uses the default configuration (broadcast capacity 16).
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new Store with custom configuration
    ///
    /// # Arguments
    ///
    /// - `initial_state`: Initial state value
    /// - `reducer`: The reducer implementation (workflow logic)
    /// - `environment`: Dependencies injected into the reducer
    /// - `config`: Broadcast capacity and shutdown behavior
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
            cancellations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for pending
    /// effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
    /// all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(
                    pending_effects = pending,
                    "Shutdown timeout: {} effects still running",
                    pending
                );
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires write lock on state
    /// 2. Calls reducer with (state, action, environment)
    /// 3. Executes returned effects asynchronously
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// # Concurrency and Effect Execution
    ///
    /// - The reducer executes synchronously while holding a write lock
    /// - Effects execute asynchronously in spawned tasks
    /// - `send()` returns after starting effect execution, not completion
    /// - Multiple concurrent `send()` calls serialize at the reducer level
    /// - Effects may complete in non-deterministic order
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
    where
        R: Clone,
        E: Clone,
    {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        tracing::debug!("Processing action");
        metrics::counter!("store.commands.total").increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            let duration = start.elapsed();
            metrics::histogram!("store.reducer.duration_seconds").record(duration.as_secs_f64());

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            effects
        };

        for effect in effects {
            self.execute_effect_internal(effect, tracking.clone());
        }
        tracing::debug!("Action processing completed, returning handle");

        Ok(handle)
    }

    /// Send an action and wait for a matching result action
    ///
    /// This method is designed for request-response interactions with a
    /// workflow: subscribe to the action broadcast, send the initial action,
    /// then wait for an action matching the predicate.
    ///
    /// # Arguments
    ///
    /// - `action`: The initial action to send
    /// - `predicate`: Function to test if an action is the terminal result
    /// - `timeout`: Maximum time to wait for a matching action
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action arrived
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = store.send_and_wait_for(
    ///     BookingAction::CheckAvailability,
    ///     |a| matches!(a,
    ///         BookingAction::PricingCalculated { .. } |
    ///         BookingAction::AvailabilityRejected { .. }
    ///     ),
    ///     Duration::from_secs(10),
    /// ).await?;
    /// ```
    ///
    /// # Notes
    ///
    /// - Only actions produced by effects are broadcast (not the initial action)
    /// - If the channel lags and drops actions, waiting continues (timeout catches it)
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        R: Clone,
        E: Clone,
        F: Fn(&A) -> bool,
    {
        // Subscribe BEFORE sending to avoid race condition
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {} // Not the action we want, keep waiting
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    }
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by this store's effects
    ///
    /// Returns a receiver that gets a clone of every action produced by
    /// effects. Initial actions sent via `send` are not broadcast.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released promptly:
    ///
    /// ```ignore
    /// let step = store.state(|s| s.step).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Spawn an async computation that feeds its resulting action back
    ///
    /// Returns the task's abort handle so cancellable effects can register it.
    fn spawn_feedback(
        &self,
        fut: std::pin::Pin<Box<dyn Future<Output = Option<A>> + Send>>,
        tracking: EffectTracking,
    ) -> AbortHandle
    where
        R: Clone,
        E: Clone,
    {
        tracking.increment();
        self.pending_effects.fetch_add(1, Ordering::SeqCst);
        let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

        let store = self.clone();
        let task = tokio::spawn(async move {
            let _guard = DecrementGuard(tracking);
            let _pending_guard = pending_guard; // Decrement on drop

            if let Some(action) = fut.await {
                tracing::trace!("Effect produced an action, sending to store");

                // Send action back to store (auto-feedback), then broadcast
                // to observers. Observers therefore always see state with the
                // action already applied.
                let _ = store.send(action.clone()).await;
                let _ = store.action_broadcast.send(action);
            } else {
                tracing::trace!("Effect completed with no action");
            }
        });
        task.abort_handle()
    }

    /// Execute an effect with tracking
    ///
    /// # Effect Types
    ///
    /// - `None`: no-op
    /// - `Future`: executes async computation, feeds resulting action back
    /// - `Delay`: waits for the duration, then sends the action
    /// - `Parallel`: executes effects concurrently
    /// - `Sequential`: executes effects in order, waiting for each to complete
    /// - `Cancellable`: like `Future`, but aborts the superseded task under the same key
    /// - `CancelKey`: aborts the in-flight task under the key, if any
    ///
    /// # Error Handling Strategy
    ///
    /// Reducer panics propagate (reducers must be pure and panic-free).
    /// Effect task failures are logged and do not halt the store; the
    /// [`DecrementGuard`] keeps the counters consistent even on abort.
    #[tracing::instrument(skip(self, effect, tracking), name = "execute_effect")]
    fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
    where
        R: Clone,
        E: Clone,
    {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                tracing::trace!("Executing Effect::Future");
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let _ = self.spawn_feedback(fut, tracking);
            },
            Effect::Delay { duration, action } => {
                tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let tracking_clone = tracking.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard; // Decrement on drop

                    tokio::time::sleep(duration).await;
                    tracing::trace!("Effect::Delay completed, sending action");

                    let _ = store.send((*action).clone()).await;
                    let _ = store.action_broadcast.send(*action);
                });
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                for effect in effects {
                    self.execute_effect_internal(effect, tracking.clone());
                }
            },
            Effect::Sequential(effects) => {
                let effect_count = effects.len();
                tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let tracking_clone = tracking.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard; // Decrement on drop

                    // Execute effects one by one, waiting for each to complete
                    for (idx, effect) in effects.into_iter().enumerate() {
                        tracing::trace!("Executing sequential effect {} of {}", idx + 1, effect_count);

                        let (sub_tx, mut sub_rx) = watch::channel(());
                        let sub_tracking = EffectTracking {
                            counter: Arc::new(AtomicUsize::new(0)),
                            notifier: sub_tx,
                        };

                        store.execute_effect_internal(effect, sub_tracking.clone());

                        // Wait for this effect to complete before continuing
                        if sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                            let _ = sub_rx.changed().await;
                        }
                    }
                    tracing::trace!("Effect::Sequential completed");
                });
            },
            Effect::Cancellable { key, effect } => {
                tracing::trace!(key = %key, "Executing Effect::Cancellable");
                metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);

                match *effect {
                    Effect::Future(fut) => {
                        let abort = self.spawn_feedback(fut, tracking);
                        let superseded = {
                            let mut live = self
                                .cancellations
                                .lock()
                                .unwrap_or_else(std::sync::PoisonError::into_inner);
                            live.insert(key.clone(), abort)
                        };
                        if let Some(prev) = superseded {
                            tracing::debug!(key = %key, "Aborting superseded in-flight effect");
                            metrics::counter!("store.effects.superseded").increment(1);
                            prev.abort();
                        }
                    },
                    other => {
                        // Only async computations can be aborted; anything else
                        // runs uncancelled.
                        tracing::warn!(key = %key, "Cancellable wraps a non-future effect, running uncancelled");
                        self.execute_effect_internal(other, tracking);
                    },
                }
            },
            Effect::CancelKey(key) => {
                tracing::trace!(key = %key, "Executing Effect::CancelKey");
                metrics::counter!("store.effects.executed", "type" => "cancel_key").increment(1);

                let handle = {
                    let mut live = self
                        .cancellations
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                    live.remove(&key)
                };
                if let Some(handle) = handle {
                    handle.abort();
                }
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
            cancellations: Arc::clone(&self.cancellations),
        }
    }
}
