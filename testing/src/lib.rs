//! # rentflow Testing
//!
//! Testing utilities and helpers for the rentflow workspace.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A programmable [`MockRentalApi`](mocks::MockRentalApi) backend
//! - The [`ReducerTest`](reducer_test::ReducerTest) Given-When-Then harness
//!
//! ## Example
//!
//! ```ignore
//! use rentflow_testing::mocks::{MockRentalApi, RecordingNotifier};
//! use rentflow_runtime::Store;
//!
//! #[tokio::test]
//! async fn wizard_reaches_review() {
//!     let api = Arc::new(MockRentalApi::new());
//!     api.enqueue_availability(Ok(all_available()));
//!     api.enqueue_reservation_pricing(Ok(pricing()));
//!
//!     let store = Store::new(BookingState::default(), BookingReducer, env(api));
//!     // drive the wizard …
//! }
//! ```

pub mod mocks;
pub mod reducer_test;

// Re-export commonly used items
pub use mocks::{FixedClock, MockRentalApi, RecordingNotifier, StaticTokenProvider, test_clock};
pub use reducer_test::ReducerTest;
