//! Multicast action bus with thunk normalization
//!
//! The bus is the single source of truth for mutation requests: every
//! dispatched value flows through one normalizer task that flattens
//! thunks into plain actions and multicasts them, in resolution order,
//! to every subscriber (store folds, epics). The bus is an explicit
//! object passed by reference to every store and epic at construction
//! time, never a hidden module-level singleton, so each test can
//! construct its own and unrelated buses cannot cross-talk.

use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{FutureExt, Stream, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, trace, warn};

use crate::action::{Action, BoxThunk, Dispatch, ThunkFlow};

/// Buffered actions per subscriber before a slow consumer starts
/// skipping. The bus never blocks a dispatcher; a lagging subscriber
/// loses the overrun instead.
const MULTICAST_CAPACITY: usize = 256;

/// Multicast stream of dispatched actions.
///
/// Cloning is cheap; clones address the same underlying bus. The bus
/// must be created inside a Tokio runtime (it spawns its normalizer
/// task) and shuts the normalizer down once every clone is gone.
pub struct ActionBus<A: Action> {
    input_tx: mpsc::UnboundedSender<Dispatch<A>>,
    multicast: broadcast::Sender<A>,
}

impl<A: Action> Clone for ActionBus<A> {
    fn clone(&self) -> Self {
        Self {
            input_tx: self.input_tx.clone(),
            multicast: self.multicast.clone(),
        }
    }
}

impl<A: Action> ActionBus<A> {
    /// Create a new bus and spawn its normalizer task.
    pub fn new() -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (multicast, _) = broadcast::channel(MULTICAST_CAPACITY);
        let weak_input = input_tx.downgrade();
        tokio::spawn(normalize(input_rx, multicast.clone(), weak_input));
        Self {
            input_tx,
            multicast,
        }
    }

    /// Publish an action (or thunk) to the bus.
    ///
    /// Never blocks and never fails from the caller's point of view:
    /// dispatching into a torn-down pipeline is accepted and simply
    /// produces no observable state update.
    pub fn dispatch(&self, action: impl Into<Dispatch<A>>) {
        let _ = self.input_tx.send(action.into());
    }

    /// Subscribe to the stream of resolved actions.
    ///
    /// The subscription is multicast, not buffered: late subscribers
    /// miss prior actions. Every live subscriber sees every action
    /// exactly once, in the single total order established by the
    /// normalizer (which is fold order, not necessarily dispatch order
    /// for mixed sync/thunk traffic).
    pub fn subscribe(&self) -> ActionStream<A> {
        ActionStream::new(self.multicast.subscribe())
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.multicast.receiver_count()
    }
}

impl<A: Action> Default for ActionBus<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizer loop: classifies dispatched values and serializes the
/// resolved plain actions onto the multicast channel.
///
/// Thunks are resolved concurrently on their own tasks; their outputs
/// re-enter the input channel, so the total order seen by subscribers
/// is resolution order. Holds only a weak sender so the loop ends once
/// every external bus clone is dropped.
async fn normalize<A: Action>(
    mut input_rx: mpsc::UnboundedReceiver<Dispatch<A>>,
    multicast: broadcast::Sender<A>,
    weak_input: mpsc::WeakUnboundedSender<Dispatch<A>>,
) {
    while let Some(dispatched) = input_rx.recv().await {
        match dispatched {
            Dispatch::Action(action) => {
                trace!(action = action.name(), "action resolved");
                // Send fails only when nobody is subscribed yet.
                let _ = multicast.send(action);
            }
            Dispatch::Thunk(thunk) => {
                let Some(input_tx) = weak_input.upgrade() else {
                    continue;
                };
                let bus = ActionBus {
                    input_tx,
                    multicast: multicast.clone(),
                };
                tokio::spawn(resolve(thunk, bus));
            }
        }
    }
    debug!("action bus closed, normalizer stopped");
}

/// Resolve one thunk into plain actions, feeding them back through the
/// bus. A panicking thunk is a diagnostic no-op: it must never take the
/// normalizer or any fold down with it.
async fn resolve<A: Action>(thunk: BoxThunk<A>, bus: ActionBus<A>) {
    let flow = match std::panic::catch_unwind(AssertUnwindSafe(|| thunk(bus.clone()))) {
        Ok(flow) => flow,
        Err(_) => {
            error!("async action panicked when invoked; no actions were produced");
            return;
        }
    };

    let drain = async {
        match flow {
            ThunkFlow::Empty => {}
            ThunkFlow::Action(action) => bus.dispatch(action),
            ThunkFlow::Future(future) => {
                if let Some(action) = future.await {
                    bus.dispatch(action);
                }
            }
            ThunkFlow::Stream(mut stream) => {
                while let Some(action) = stream.next().await {
                    bus.dispatch(action);
                }
            }
        }
    };

    if AssertUnwindSafe(drain).catch_unwind().await.is_err() {
        error!("async action panicked mid-flow; remaining actions were dropped");
    }
}

/// A subscription to the bus.
///
/// Yields resolved plain actions. A subscriber that falls more than the
/// channel capacity behind logs a warning and skips the missed actions
/// rather than stalling dispatchers.
pub struct ActionStream<A> {
    inner: BroadcastStream<A>,
}

impl<A: Action> ActionStream<A> {
    fn new(rx: broadcast::Receiver<A>) -> Self {
        Self {
            inner: BroadcastStream::new(rx),
        }
    }

    /// Receive the next action, or `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<A> {
        StreamExt::next(self).await
    }

    /// Narrow the subscription to actions of one exact type string.
    pub fn of_type(self, name: &'static str) -> OfType<A> {
        OfType { inner: self, name }
    }
}

impl<A: Action> Stream for ActionStream<A> {
    type Item = A;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<A>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(action))) => return Poll::Ready(Some(action)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(missed)))) => {
                    warn!(missed, "action subscriber lagged; skipping missed actions");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// See [`ActionStream::of_type`].
pub struct OfType<A> {
    inner: ActionStream<A>,
    name: &'static str,
}

impl<A: Action> OfType<A> {
    /// Receive the next matching action.
    pub async fn next(&mut self) -> Option<A> {
        StreamExt::next(self).await
    }
}

impl<A: Action> Stream for OfType<A> {
    type Item = A;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<A>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(action)) if action.name() == self.name => {
                    return Poll::Ready(Some(action))
                }
                Poll::Ready(Some(_)) => {}
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::action::thunk;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Ping,
        Pong,
        Value(i32),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Ping => "@test/PING",
                TestAction::Pong => "@test/PONG",
                TestAction::Value(_) => "@test/VALUE",
            }
        }
    }

    async fn recv(stream: &mut ActionStream<TestAction>) -> TestAction {
        tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("timeout")
            .expect("bus closed")
    }

    #[tokio::test]
    async fn test_sync_actions_arrive_in_dispatch_order() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut stream = bus.subscribe();

        bus.dispatch(TestAction::Value(1));
        bus.dispatch(TestAction::Value(2));
        bus.dispatch(TestAction::Value(3));

        assert_eq!(recv(&mut stream).await, TestAction::Value(1));
        assert_eq!(recv(&mut stream).await, TestAction::Value(2));
        assert_eq!(recv(&mut stream).await, TestAction::Value(3));
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_prior_actions() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut early = bus.subscribe();

        bus.dispatch(TestAction::Value(1));
        assert_eq!(recv(&mut early).await, TestAction::Value(1));

        let mut late = bus.subscribe();
        bus.dispatch(TestAction::Value(2));
        assert_eq!(recv(&mut late).await, TestAction::Value(2));
    }

    #[tokio::test]
    async fn test_multicast_delivers_to_every_subscriber() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.dispatch(TestAction::Ping);

        assert_eq!(recv(&mut a).await, TestAction::Ping);
        assert_eq!(recv(&mut b).await, TestAction::Ping);
    }

    #[tokio::test]
    async fn test_thunk_future_resolves_to_action() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut stream = bus.subscribe();

        bus.dispatch(thunk(|_bus| {
            ThunkFlow::future(async { Some(TestAction::Pong) })
        }));

        assert_eq!(recv(&mut stream).await, TestAction::Pong);
    }

    #[tokio::test]
    async fn test_thunk_stream_yields_multiple_actions() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut stream = bus.subscribe();

        bus.dispatch(thunk(|_bus| {
            ThunkFlow::stream(futures::stream::iter(vec![
                TestAction::Value(1),
                TestAction::Value(2),
            ]))
        }));

        assert_eq!(recv(&mut stream).await, TestAction::Value(1));
        assert_eq!(recv(&mut stream).await, TestAction::Value(2));
    }

    #[tokio::test]
    async fn test_thunk_can_coordinate_over_the_bus() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut stream = bus.subscribe();

        // Answers the first Ping it observes with a Pong.
        bus.dispatch(thunk(|bus| {
            ThunkFlow::future(async move {
                let mut pings = bus.subscribe().of_type("@test/PING");
                pings.next().await.map(|_| TestAction::Pong)
            })
        }));

        // Give the thunk a moment to subscribe before pinging.
        tokio::time::sleep(Duration::from_millis(20)).await;
        bus.dispatch(TestAction::Ping);

        assert_eq!(recv(&mut stream).await, TestAction::Ping);
        assert_eq!(recv(&mut stream).await, TestAction::Pong);
    }

    #[tokio::test]
    async fn test_panicking_thunk_is_a_noop() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut stream = bus.subscribe();

        bus.dispatch(thunk(|_bus| -> ThunkFlow<TestAction> {
            panic!("broken thunk")
        }));
        bus.dispatch(TestAction::Ping);

        // The pipeline survives and only the sync action arrives.
        assert_eq!(recv(&mut stream).await, TestAction::Ping);
    }

    #[tokio::test]
    async fn test_panicking_thunk_future_is_contained() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut stream = bus.subscribe();

        bus.dispatch(thunk(|_bus| {
            ThunkFlow::future(async { panic!("broken future") })
        }));
        bus.dispatch(TestAction::Pong);

        assert_eq!(recv(&mut stream).await, TestAction::Pong);
    }

    #[tokio::test]
    async fn test_of_type_filters_exact_matches() {
        let bus: ActionBus<TestAction> = ActionBus::new();
        let mut pongs = bus.subscribe().of_type("@test/PONG");

        bus.dispatch(TestAction::Ping);
        bus.dispatch(TestAction::Pong);
        bus.dispatch(TestAction::Value(7));
        bus.dispatch(TestAction::Pong);

        let first = tokio::time::timeout(Duration::from_secs(1), pongs.next())
            .await
            .expect("timeout")
            .expect("bus closed");
        let second = tokio::time::timeout(Duration::from_secs(1), pongs.next())
            .await
            .expect("timeout")
            .expect("bus closed");

        assert_eq!(first, TestAction::Pong);
        assert_eq!(second, TestAction::Pong);
    }
}
