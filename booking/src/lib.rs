//! # rentflow Booking
//!
//! Domain crate for the rentflow rental admin client: the reservation
//! booking wizard, the standalone price calculator, and the invoice
//! query/mutation layer, all built on the rentflow-core reducer pattern and
//! executed by the rentflow-runtime `Store`.
//!
//! ## Modules
//!
//! - [`types`] — wire and domain types shared across workflows
//! - [`api`] — the [`RentalApi`](api::RentalApi) backend contract and its
//!   reqwest adapter
//! - [`booking`] — the three-step reservation wizard reducer
//! - [`pricing`] — the single-item price calculator reducer
//! - [`query`] — cached invoice queries and notifying mutations
//! - [`format`] — Turkish-locale display formatting
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rentflow_booking::booking::{BookingAction, BookingEnvironment, BookingReducer, BookingState};
//! use rentflow_runtime::Store;
//!
//! let store = Store::new(BookingState::default(), BookingReducer, environment);
//! store.send(BookingAction::LoadCatalog).await?;
//! ```

pub mod api;
pub mod booking;
pub mod format;
pub mod pricing;
pub mod query;
pub mod types;
