//! Auto-dismiss countdown epic
//!
//! One countdown task per auto-close toast, driven by an explicit
//! finite-state machine instead of a stream-operator chain: every
//! `(phase, event)` transition is a row in [`Countdown::step`], which
//! makes the pause/resume/terminate behavior auditable and testable
//! without timers.

use std::time::Duration;

use tokio::time::{interval, Interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use flowstore_core::{ActionBus, EpicKey, Epics};

use crate::actions::ToastAction;
use crate::types::Toast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Paused,
}

/// An event scoped to one toast's countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CountdownEvent {
    /// One second of active countdown elapsed.
    Tick,
    /// Pointer entered the toast; freeze.
    Pause,
    /// Pointer left the toast; resume.
    Resume,
    /// External dismiss or clear-all; stop without emitting.
    Terminate,
}

/// What a transition asks the driver to do.
#[derive(Debug, Default, PartialEq)]
struct Step {
    /// Actions to publish, in order.
    actions: Vec<ToastAction>,
    /// Whether the countdown is finished (dismissed or cancelled).
    done: bool,
    /// Whether the tick timer must restart from a full period.
    restart_timer: bool,
}

/// Countdown state machine for a single toast.
#[derive(Debug)]
struct Countdown {
    toast: Toast,
    remaining: u64,
    phase: Phase,
}

impl Countdown {
    fn new(toast: Toast) -> Self {
        let remaining = toast.ticks();
        Self {
            toast,
            remaining,
            phase: Phase::Running,
        }
    }

    fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    fn step(&mut self, event: CountdownEvent) -> Step {
        match (self.phase, event) {
            (Phase::Running, CountdownEvent::Tick) => {
                self.remaining = self.remaining.saturating_sub(1);
                let mut ticked = self.toast.clone();
                ticked.countdown = Some(self.remaining);
                let mut actions = vec![ToastAction::Update(ticked)];
                let done = self.remaining == 0;
                if done {
                    actions.push(ToastAction::Dismiss(self.toast.id.clone()));
                }
                Step {
                    actions,
                    done,
                    restart_timer: false,
                }
            }
            (Phase::Running, CountdownEvent::Pause) => {
                self.phase = Phase::Paused;
                Step::default()
            }
            (Phase::Paused, CountdownEvent::Resume) => {
                self.phase = Phase::Running;
                Step {
                    restart_timer: true,
                    ..Step::default()
                }
            }
            (_, CountdownEvent::Terminate) => Step {
                done: true,
                ..Step::default()
            },
            // Pause while paused, resume while running, tick while
            // paused (the driver disarms the timer): identity.
            _ => Step::default(),
        }
    }
}

fn classify(action: &ToastAction, id: &str) -> Option<CountdownEvent> {
    match action {
        ToastAction::MouseEnter(target) if target == id => Some(CountdownEvent::Pause),
        ToastAction::MouseLeave(target) if target == id => Some(CountdownEvent::Resume),
        ToastAction::Dismiss(target) if target == id => Some(CountdownEvent::Terminate),
        ToastAction::ClearAll => Some(CountdownEvent::Terminate),
        _ => None,
    }
}

/// Interval whose next tick is one full period away, not immediate.
fn armed_ticker() -> Interval {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.reset();
    ticker
}

/// Drive one toast's countdown until it dismisses or is cancelled.
async fn run_countdown(bus: ActionBus<ToastAction>, toast: Toast) {
    let mut actions = bus.subscribe();
    let mut fsm = Countdown::new(toast);
    let mut ticker = armed_ticker();

    loop {
        let event = tokio::select! {
            _ = ticker.tick(), if fsm.is_running() => CountdownEvent::Tick,
            action = actions.next() => match action {
                Some(action) => match classify(&action, &fsm.toast.id) {
                    Some(event) => event,
                    None => continue,
                },
                // Bus gone; nothing left to count down for.
                None => break,
            },
        };

        let step = fsm.step(event);
        if step.restart_timer {
            ticker = armed_ticker();
        }
        for action in step.actions {
            bus.dispatch(action);
        }
        if step.done {
            break;
        }
    }
    debug!(id = %fsm.toast.id, "countdown finished");
}

/// Handle to the auto-dismiss epic. Dropping it (or calling
/// [`shutdown`](AutoDismiss::shutdown)) cancels the dispatcher and every
/// outstanding countdown transitively.
pub struct AutoDismiss {
    cancel: CancellationToken,
}

impl AutoDismiss {
    /// Stop the epic and every countdown it spawned.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for AutoDismiss {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Watch the bus for toast creations and run a countdown per
/// auto-close toast.
///
/// Toasts without `auto_close` bypass the state machine entirely and
/// persist until an explicit dismiss or clear-all. Countdowns are keyed
/// by toast id: re-creating a live toast restarts its countdown, and
/// dismissals cancel it eagerly.
pub fn spawn_auto_dismiss(bus: &ActionBus<ToastAction>) -> AutoDismiss {
    let cancel = CancellationToken::new();
    tokio::spawn(dispatch_countdowns(bus.clone(), cancel.clone()));
    AutoDismiss { cancel }
}

async fn dispatch_countdowns(bus: ActionBus<ToastAction>, cancel: CancellationToken) {
    let mut actions = bus.subscribe();
    let mut epics = Epics::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            action = actions.next() => match action {
                Some(ToastAction::Create(toast)) if toast.auto_close => {
                    debug!(id = %toast.id, delay_ms = toast.delay_ms, "countdown started");
                    let key = EpicKey::new(toast.id.clone());
                    epics.spawn(key, run_countdown(bus.clone(), toast));
                }
                Some(ToastAction::Dismiss(id)) => epics.cancel(&EpicKey::new(id)),
                Some(ToastAction::ClearAll) => epics.cancel_all(),
                Some(_) => {}
                None => break,
            },
        }
    }
    // Dropping the registry aborts any countdown still running.
}
