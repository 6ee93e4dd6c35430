//! Stream-driven action/state store for async Rust
//!
//! flowstore is a small Redux-inspired toolkit built on Tokio: a
//! multicast [`ActionBus`] carrying sync and async ("thunk") actions, a
//! [`Store`] that folds the resolved action stream through pure
//! reducers, memoized [`Selector`]s for subscribers, and keyed
//! [`Epics`] for long-lived reactive side effects.
//!
//! The optional domain crates layer on top:
//!
//! - `forms`: field validation pipelines with throttled submits
//! - `toasts`: toast notifications with pause/resume auto-dismiss
//!   countdowns
//!
//! # Quick start
//!
//! ```ignore
//! use flowstore::prelude::*;
//!
//! #[derive(Clone, Debug)]
//! enum TodoAction {
//!     Add(String),
//!     Clear,
//! }
//!
//! impl Action for TodoAction {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             TodoAction::Add(_) => "@todo/ADD",
//!             TodoAction::Clear => "@todo/CLEAR",
//!         }
//!     }
//! }
//!
//! let bus = ActionBus::new();
//! let store = Store::spawn(&bus, reducer(Vec::new(), |mut todos, action| {
//!     match action {
//!         TodoAction::Add(text) => todos.push(text.clone()),
//!         TodoAction::Clear => todos.clear(),
//!     }
//!     todos
//! }));
//!
//! store.dispatch(TodoAction::Add("ship it".into()));
//! ```

pub use flowstore_core::*;

#[cfg(feature = "forms")]
pub use flowstore_forms as forms;

#[cfg(feature = "toasts")]
pub use flowstore_toasts as toasts;
