//! Core action bus, reducer composition and store for flowstore
//!
//! This crate provides the foundational pieces for building reactive
//! state pipelines over Tokio: a multicast action bus, an async-action
//! ("thunk") normalizer, pure reducer composition and a subscription
//! layer with memoized selectors.
//!
//! # Core Concepts
//!
//! - **Action**: an intent to change state, sync (data) or async (a
//!   thunk producing a stream of actions)
//! - **ActionBus**: multicast stream of resolved actions; the single
//!   source of truth for all mutation requests
//! - **Reducer**: pure state-transition function; composable per slice
//! - **Store**: sequential fold of the action stream into state, with
//!   watch subscriptions and selectors
//! - **Epics**: keyed registry for long-lived reactive side effects
//!
//! # Basic Example
//!
//! ```ignore
//! use flowstore_core::prelude::*;
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! impl Action for CounterAction {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             CounterAction::Increment => "@counter/INCREMENT",
//!             CounterAction::Decrement => "@counter/DECREMENT",
//!         }
//!     }
//! }
//!
//! let bus = ActionBus::new();
//! let store = Store::spawn(&bus, reducer(0i64, |count, action| match action {
//!     CounterAction::Increment => count + 1,
//!     CounterAction::Decrement => count - 1,
//! }));
//!
//! store.dispatch(CounterAction::Increment);
//! ```
//!
//! # Async Actions
//!
//! A dispatched thunk receives a bus clone: it can perform side effects,
//! subscribe to the action stream to coordinate with other actions, and
//! dispatch follow-on actions before completing:
//!
//! ```ignore
//! store.dispatch(thunk(|bus| {
//!     ThunkFlow::future(async move {
//!         let profile = api::fetch_profile().await;
//!         Some(SessionAction::DidLoad(profile))
//!     })
//! }));
//! ```
//!
//! Actions are folded in the order they are *resolved*, not the order
//! their originating dispatch calls occurred: a sync action dispatched
//! while a thunk is in flight folds first.

pub mod action;
pub mod bus;
pub mod epics;
pub mod reduce;
pub mod store;
pub mod testing;

// Core exports
pub use action::{thunk, Action, BoxThunk, Dispatch, ThunkFlow};
pub use bus::{ActionBus, ActionStream, OfType};
pub use epics::{EpicKey, Epics};
pub use reduce::{deep_merge, reducer, FnReducer, Reduce, SliceMap};
pub use store::{Selector, Store};

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{thunk, Action, Dispatch, ThunkFlow};
    pub use crate::bus::{ActionBus, ActionStream};
    pub use crate::epics::{EpicKey, Epics};
    pub use crate::reduce::{reducer, Reduce, SliceMap};
    pub use crate::store::{Selector, Store};
}
