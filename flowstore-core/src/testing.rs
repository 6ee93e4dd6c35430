//! Test utilities for flowstore pipelines
//!
//! - [`ActionRecorder`]: capture every action a bus resolves, for
//!   order/count assertions
//! - [`next_action`]: timeout-guarded receive from an action stream
//! - [`settle`]: let in-flight dispatches drain through the pipeline
//!
//! With the `testing-time` feature, [`pause_time`]/[`advance_time`]
//! expose Tokio's virtual clock for deterministic timer-driven tests
//! (countdowns, throttle windows).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::action::Action;
use crate::bus::{ActionBus, ActionStream};

/// Records every action resolved by a bus from the moment it attaches.
///
/// # Example
///
/// ```ignore
/// let bus = ActionBus::new();
/// let recorder = ActionRecorder::attach(&bus);
///
/// bus.dispatch(Action::Ping);
/// settle().await;
///
/// assert_eq!(recorder.count_of("@test/PING"), 1);
/// ```
pub struct ActionRecorder<A: Action> {
    actions: Arc<Mutex<Vec<A>>>,
    handle: JoinHandle<()>,
}

impl<A: Action> ActionRecorder<A> {
    /// Subscribe to the bus and start recording.
    pub fn attach(bus: &ActionBus<A>) -> Self {
        let mut stream = bus.subscribe();
        let actions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&actions);
        let handle = tokio::spawn(async move {
            while let Some(action) = stream.next().await {
                sink.lock().expect("recorder poisoned").push(action);
            }
        });
        Self { actions, handle }
    }

    /// Snapshot of everything recorded so far, in fold order.
    pub fn recorded(&self) -> Vec<A> {
        self.actions.lock().expect("recorder poisoned").clone()
    }

    /// Take everything recorded so far, leaving the buffer empty.
    pub fn drain(&self) -> Vec<A> {
        std::mem::take(&mut *self.actions.lock().expect("recorder poisoned"))
    }

    /// Count recorded actions with the given type string.
    pub fn count_of(&self, name: &str) -> usize {
        self.actions
            .lock()
            .expect("recorder poisoned")
            .iter()
            .filter(|action| action.name() == name)
            .count()
    }
}

impl<A: Action> Drop for ActionRecorder<A> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Receive the next action within `timeout_ms`, or `None`.
pub async fn next_action<A: Action>(
    stream: &mut ActionStream<A>,
    timeout_ms: u64,
) -> Option<A> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), stream.next())
        .await
        .ok()
        .flatten()
}

/// Yield long enough for dispatched actions to clear the normalizer and
/// reach every subscriber. Under a paused clock this returns as soon as
/// the runtime is idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

/// Pause the Tokio clock. Requires a current-thread runtime.
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

/// Resume the Tokio clock after [`pause_time`].
#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

/// Advance the paused Tokio clock, firing any timers that come due.
#[cfg(feature = "testing-time")]
pub async fn advance_time(duration: Duration) {
    tokio::time::advance(duration).await;
}
