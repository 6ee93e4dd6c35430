//! Toast model

use serde::{Deserialize, Serialize};

/// Where a toast is anchored on screen. Renderers group toasts by
/// position; the store and epics only carry it along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// A single toast notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Unique id; countdown, pause/resume and dismissal are all scoped
    /// to it.
    pub id: String,
    /// Screen anchor.
    pub position: Position,
    /// Whether the toast dismisses itself after `delay_ms`.
    pub auto_close: bool,
    /// Auto-close delay in milliseconds.
    pub delay_ms: u64,
    /// Remaining whole seconds while the countdown runs; `None` for
    /// toasts that never auto-close.
    pub countdown: Option<u64>,
}

impl Toast {
    /// Create a toast; the countdown seeds from the delay when
    /// `auto_close` is set.
    pub fn new(id: impl Into<String>, position: Position, auto_close: bool, delay_ms: u64) -> Self {
        Self {
            id: id.into(),
            position,
            auto_close,
            delay_ms,
            countdown: auto_close.then(|| delay_ms / 1000),
        }
    }

    /// Whole seconds the countdown runs for.
    pub(crate) fn ticks(&self) -> u64 {
        self.delay_ms / 1000
    }
}
