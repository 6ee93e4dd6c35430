//! Action trait and the dispatch variants accepted by the bus

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::stream::{BoxStream, Stream};

use crate::bus::ActionBus;

/// Marker trait for actions that can be dispatched to the bus
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions are multicast to every subscriber
/// - Debug: For debugging and logging
/// - Send + 'static: For async dispatch across tasks
pub trait Action: Clone + fmt::Debug + Send + 'static {
    /// Get the action type string for logging and filtering
    ///
    /// Consumers filter the action stream by exact match on this string,
    /// so types must be namespaced per domain (e.g. `@form/UPDATE`) to
    /// avoid cross-talk between unrelated stores on a shared bus.
    fn name(&self) -> &'static str;
}

/// A boxed async action: invoked with the bus, returns the actions it
/// wants folded.
pub type BoxThunk<A> = Box<dyn FnOnce(ActionBus<A>) -> ThunkFlow<A> + Send + 'static>;

/// A value accepted by [`ActionBus::dispatch`].
///
/// This is the tagged union behind the dispatch contract: either a plain
/// synchronous action, or a thunk that produces zero or more actions
/// asynchronously. Plain actions convert implicitly via `From`, so
/// `bus.dispatch(MyAction::Foo)` works directly.
pub enum Dispatch<A: Action> {
    /// A synchronous action, folded as-is.
    Action(A),
    /// An async action. The thunk receives a bus clone, so it can
    /// dispatch follow-on actions and subscribe to the action stream
    /// (for cancellation or coordination) before completing.
    Thunk(BoxThunk<A>),
}

impl<A: Action> From<A> for Dispatch<A> {
    fn from(action: A) -> Self {
        Dispatch::Action(action)
    }
}

impl<A: Action> fmt::Debug for Dispatch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Dispatch::Thunk(_) => f.write_str("Thunk"),
        }
    }
}

/// Build an async action from a closure.
///
/// # Example
///
/// ```ignore
/// bus.dispatch(thunk(|bus| {
///     ThunkFlow::future(async move {
///         let data = fetch().await;
///         Some(Action::DidFetch(data))
///     })
/// }));
/// ```
pub fn thunk<A, F>(f: F) -> Dispatch<A>
where
    A: Action,
    F: FnOnce(ActionBus<A>) -> ThunkFlow<A> + Send + 'static,
{
    Dispatch::Thunk(Box::new(f))
}

/// The result shapes a thunk may produce.
///
/// All variants are flattened into plain actions by the bus normalizer
/// and re-enter the dispatch pipeline, so a single thunk yields 0..N net
/// state transitions, interleaved with concurrently dispatched actions.
pub enum ThunkFlow<A> {
    /// No actions at all.
    Empty,
    /// A single action, available immediately.
    Action(A),
    /// Async work resolving to at most one action.
    Future(BoxFuture<'static, Option<A>>),
    /// A stream of zero or more actions over time.
    Stream(BoxStream<'static, A>),
}

impl<A: Action> ThunkFlow<A> {
    /// Wrap a single ready action.
    pub fn action(action: A) -> Self {
        ThunkFlow::Action(action)
    }

    /// Wrap a future resolving to an optional action.
    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = Option<A>> + Send + 'static,
    {
        ThunkFlow::Future(Box::pin(future))
    }

    /// Wrap a stream of actions.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = A> + Send + 'static,
    {
        ThunkFlow::Stream(Box::pin(stream))
    }
}

impl<A> fmt::Debug for ThunkFlow<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThunkFlow::Empty => "Empty",
            ThunkFlow::Action(_) => "Action",
            ThunkFlow::Future(_) => "Future",
            ThunkFlow::Stream(_) => "Stream",
        };
        f.write_str(label)
    }
}
