//! Toast store and auto-dismiss countdown epic for flowstore
//!
//! Toast state is a plain list folded by a pure reducer; the
//! interesting part is the epic: every auto-close toast gets its own
//! countdown task that ticks once a second, freezes while the pointer
//! hovers the toast, and dismisses the toast when the countdown hits
//! zero, unless an external dismiss or clear-all cancels it first.
//!
//! # Example
//!
//! ```ignore
//! use flowstore_core::{ActionBus, Store};
//! use flowstore_toasts::{spawn_auto_dismiss, toast_reducer, Position, Toast, ToastAction};
//!
//! let bus = ActionBus::new();
//! let store = Store::spawn(&bus, toast_reducer());
//! let epic = spawn_auto_dismiss(&bus);
//!
//! bus.dispatch(ToastAction::Create(Toast::new(
//!     "saved", Position::TopRight, true, 5000,
//! )));
//! // Five seconds later the toast dismisses itself.
//! ```

pub mod actions;
pub mod epic;
pub mod reducer;
pub mod types;

pub use actions::{
    ToastAction, CLEAR_ALL, CREATE, DISMISS, MOUSE_ENTER, MOUSE_LEAVE, UPDATE,
};
pub use epic::{spawn_auto_dismiss, AutoDismiss};
pub use reducer::{toast_reducer, ToastState};
pub use types::{Position, Toast};
