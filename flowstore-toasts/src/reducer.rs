//! Pure toast reducer

use flowstore_core::{reducer, FnReducer};

use crate::actions::ToastAction;
use crate::types::Toast;

/// Toasts currently on screen, in creation order.
pub type ToastState = Vec<Toast>;

/// Build the toast reducer.
///
/// Mouse enter/leave are pass-through: hover only affects the countdown
/// epic, never the visible state.
pub fn toast_reducer(
) -> FnReducer<ToastState, impl Fn(ToastState, &ToastAction) -> ToastState + Send + 'static> {
    reducer(Vec::new(), |mut state: ToastState, action: &ToastAction| {
        match action {
            ToastAction::Create(toast) => {
                state.retain(|existing| existing.id != toast.id);
                state.push(toast.clone());
            }
            ToastAction::Update(toast) => {
                if let Some(slot) = state.iter_mut().find(|existing| existing.id == toast.id) {
                    *slot = toast.clone();
                }
            }
            ToastAction::Dismiss(id) => state.retain(|toast| &toast.id != id),
            ToastAction::ClearAll => state.clear(),
            ToastAction::MouseEnter(_) | ToastAction::MouseLeave(_) => {}
        }
        state
    })
}
