//! # rentflow Core
//!
//! Core traits and types for the rentflow composable client architecture.
//!
//! This crate provides the fundamental abstractions for building client-side,
//! server-validated workflows (booking wizards, calculators, list screens)
//! using the Reducer pattern.
//!
//! ## Core Concepts
//!
//! - **State**: the local state of a workflow or screen
//! - **Action**: all possible inputs to a reducer (user commands, API result events)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use rentflow_core::reducer::Reducer;
//! use rentflow_core::effect::Effect;
//!
//! impl Reducer for BookingReducer {
//!     type State = BookingState;
//!     type Action = BookingAction;
//!     type Environment = BookingEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BookingState,
//!         action: BookingAction,
//!         env: &BookingEnvironment,
//!     ) -> Vec<Effect<BookingAction>> {
//!         // Business logic goes here
//!         vec![]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all decision logic (validation gates, transition guards) and
/// are deterministic and testable without a runtime.
pub mod reducer {
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for workflow logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The workflow state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for QuoteReducer {
    ///     type State = QuoteState;
    ///     type Action = QuoteAction;
    ///     type Environment = QuoteEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut QuoteState,
    ///         action: QuoteAction,
    ///         env: &QuoteEnvironment,
    ///     ) -> Vec<Effect<QuoteAction>> {
    ///         match action {
    ///             QuoteAction::SetQuantity(q) => {
    ///                 // Validation and state mutation here
    ///                 vec![Effect::None]
    ///             }
    ///             _ => vec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// A vector of effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Vec<Effect<Self::Action>>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Key identifying a cancellable in-flight effect
    ///
    /// Scheduling a new [`Effect::Cancellable`] under a key that already has a
    /// live task aborts the superseded task first. This is how auto-triggered
    /// recalculations discard their predecessors instead of racing them.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct EffectKey(pub &'static str);

    impl std::fmt::Display for EffectKey {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, debounced triggers)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// An effect whose in-flight task can be superseded or cancelled by key
        ///
        /// When the runtime schedules a `Cancellable` effect it aborts any
        /// still-running task previously scheduled under the same key.
        Cancellable {
            /// Cancellation key shared by all instances of this operation
            key: EffectKey,
            /// The effect to execute
            effect: Box<Effect<Action>>,
        },

        /// Abort the in-flight task registered under the key, if any
        CancelKey(EffectKey),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { key, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("key", key)
                    .field("effect", effect)
                    .finish(),
                Effect::CancelKey(key) => {
                    f.debug_tuple("Effect::CancelKey").field(key).finish()
                },
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation as an [`Effect::Future`]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Wrap an async computation as a keyed [`Effect::Cancellable`]
        pub fn cancellable<F>(key: EffectKey, fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Cancellable {
                key,
                effect: Box::new(Effect::future(fut)),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter, so reducers can be exercised with fakes.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// let clock = SystemClock;
    ///
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock implementation for production use
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Authentication capability injected into the HTTP layer
    ///
    /// Replaces ambient credential storage: the HTTP adapter asks this
    /// capability for the current bearer token and reports expiry through
    /// `on_unauthorized`, so workflows can be tested with a fake provider.
    pub trait TokenProvider: Send + Sync {
        /// Current bearer token, if a session exists
        fn token(&self) -> Option<String>;

        /// Called when the server rejects the token (401/403)
        fn on_unauthorized(&self);
    }

    /// Severity of a user-facing notification
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum NoticeLevel {
        /// Operation completed
        Success,
        /// Operation failed
        Error,
    }

    /// User-facing notification sink
    ///
    /// Every mutating operation surfaces exactly one success or failure
    /// notification through this capability. Failure messages prefer the
    /// server's structured message and fall back to a generic localized
    /// string at the call site.
    pub trait Notifier: Send + Sync {
        /// Deliver a notification to the user
        fn notify(&self, level: NoticeLevel, message: &str);

        /// Convenience: success notification
        fn success(&self, message: &str) {
            self.notify(NoticeLevel::Success, message);
        }

        /// Convenience: error notification
        fn error(&self, message: &str) {
            self.notify(NoticeLevel::Error, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::{Effect, EffectKey};

    #[test]
    fn effect_debug_formats_every_variant() {
        let fut: Effect<u32> = Effect::future(async { Some(1) });
        assert_eq!(format!("{fut:?}"), "Effect::Future(<future>)");

        let cancel: Effect<u32> = Effect::CancelKey(EffectKey("quote"));
        assert!(format!("{cancel:?}").contains("quote"));

        let none: Effect<u32> = Effect::None;
        assert_eq!(format!("{none:?}"), "Effect::None");
    }

    #[test]
    fn merge_and_chain_wrap_effects() {
        let merged: Effect<u32> = Effect::merge(vec![Effect::None, Effect::None]);
        assert!(matches!(merged, Effect::Parallel(v) if v.len() == 2));

        let chained: Effect<u32> = Effect::chain(vec![Effect::None]);
        assert!(matches!(chained, Effect::Sequential(v) if v.len() == 1));
    }
}
