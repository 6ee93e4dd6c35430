//! Toast action types and constants

use flowstore_core::Action;

use crate::types::Toast;

pub const CREATE: &str = "@toast/CREATE";
pub const UPDATE: &str = "@toast/UPDATE";
pub const DISMISS: &str = "@toast/DISMISS";
pub const MOUSE_ENTER: &str = "@toast/MOUSE_ENTER";
pub const MOUSE_LEAVE: &str = "@toast/MOUSE_LEAVE";
pub const CLEAR_ALL: &str = "@toast/CLEAR_ALL";

#[derive(Clone, Debug, PartialEq)]
pub enum ToastAction {
    /// Show a toast; auto-close toasts also start their countdown epic.
    Create(Toast),
    /// Countdown tick carrying the toast with its new remaining time.
    Update(Toast),
    /// Remove the toast with this id, cancelling its countdown.
    Dismiss(String),
    /// Pointer entered the toast with this id; countdown freezes.
    MouseEnter(String),
    /// Pointer left the toast with this id; countdown resumes.
    MouseLeave(String),
    /// Remove every toast and cancel every countdown.
    ClearAll,
}

impl Action for ToastAction {
    fn name(&self) -> &'static str {
        match self {
            ToastAction::Create(_) => CREATE,
            ToastAction::Update(_) => UPDATE,
            ToastAction::Dismiss(_) => DISMISS,
            ToastAction::MouseEnter(_) => MOUSE_ENTER,
            ToastAction::MouseLeave(_) => MOUSE_LEAVE,
            ToastAction::ClearAll => CLEAR_ALL,
        }
    }
}
