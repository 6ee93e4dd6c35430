//! Store: sequential action fold with watch-based subscriptions
//!
//! A store subscribes one fold task to a bus, scans every resolved
//! action through its reducer and publishes each new state snapshot.
//! Folding is strictly sequential: the Nth action is folded only after
//! the (N-1)th fold has produced its output state, so there is no
//! reentrant folding even when many thunks are in flight upstream.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::action::{Action, Dispatch};
use crate::bus::{ActionBus, ActionStream};
use crate::reduce::Reduce;

/// Handle to a running store.
///
/// Cloning is cheap; clones address the same fold. The fold is torn
/// down by [`shutdown`](Store::shutdown) or when the last handle is
/// dropped. After teardown the bus still accepts dispatches; they just
/// produce no observable state update for this store.
pub struct Store<S, A: Action> {
    bus: ActionBus<A>,
    state_rx: watch::Receiver<S>,
    initial: S,
    guard: Arc<StoreGuard>,
}

struct StoreGuard {
    cancel: CancellationToken,
}

impl Drop for StoreGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<S, A: Action> Clone for Store<S, A>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
            state_rx: self.state_rx.clone(),
            initial: self.initial.clone(),
            guard: Arc::clone(&self.guard),
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    /// Subscribe a new fold to the bus.
    ///
    /// Initial state is computed once, before any action is observed;
    /// actions dispatched before `spawn` returns are not replayed into
    /// the fold.
    pub fn spawn<R>(bus: &ActionBus<A>, reducer: R) -> Self
    where
        R: Reduce<A, State = S>,
    {
        let initial = reducer.initial();
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let cancel = CancellationToken::new();
        let actions = bus.subscribe();
        tokio::spawn(fold(reducer, initial.clone(), actions, state_tx, cancel.clone()));
        Self {
            bus: bus.clone(),
            state_rx,
            initial,
            guard: Arc::new(StoreGuard { cancel }),
        }
    }

    /// Publish an action (or thunk) to the bus.
    pub fn dispatch(&self, action: impl Into<Dispatch<A>>) {
        self.bus.dispatch(action);
    }

    /// Current state snapshot.
    ///
    /// The snapshot is owned by the caller; mutating it never affects
    /// the store or any other subscriber.
    pub fn state(&self) -> S {
        self.state_rx.borrow().clone()
    }

    /// State as computed at store construction.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// Watch receiver over folded states, for re-render loops.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state_rx.clone()
    }

    /// Subscribe to the underlying action stream.
    pub fn actions(&self) -> ActionStream<A> {
        self.bus.subscribe()
    }

    /// The bus this store folds from.
    pub fn bus(&self) -> &ActionBus<A> {
        &self.bus
    }

    /// Derive a memoized view over the state.
    pub fn select<T, F>(&self, select: F) -> Selector<S, T, F>
    where
        T: Clone + PartialEq,
        F: FnMut(&S) -> T,
    {
        Selector::new(self.state_rx.clone(), select)
    }

    /// Stop folding. Idempotent; affects every clone of this handle.
    pub fn shutdown(&self) {
        self.guard.cancel.cancel();
    }
}

async fn fold<R, A>(
    reducer: R,
    initial: R::State,
    mut actions: ActionStream<A>,
    state_tx: watch::Sender<R::State>,
    cancel: CancellationToken,
) where
    A: Action,
    R: Reduce<A>,
{
    let mut state = initial;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            action = actions.next() => match action {
                Some(action) => {
                    state = reducer.reduce(state, &action);
                    trace!(action = action.name(), "action folded");
                    let _ = state_tx.send(state.clone());
                }
                None => break,
            },
        }
    }
    debug!("store fold stopped");
}

/// A memoized view over a store's state.
///
/// Applies the selector to every published state but only yields when
/// the selected value actually changes (`PartialEq`), so dependents are
/// not re-rendered for unrelated state transitions.
pub struct Selector<S, T, F> {
    state_rx: watch::Receiver<S>,
    select: F,
    current: T,
}

impl<S, T, F> Selector<S, T, F>
where
    T: Clone + PartialEq,
    F: FnMut(&S) -> T,
{
    fn new(mut state_rx: watch::Receiver<S>, mut select: F) -> Self {
        let current = {
            let state = state_rx.borrow_and_update();
            select(&*state)
        };
        Self {
            state_rx,
            select,
            current,
        }
    }

    /// The most recently selected value.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Wait until the selected value changes, returning the new value.
    /// Returns `None` once the store fold is gone.
    pub async fn changed(&mut self) -> Option<T> {
        loop {
            self.state_rx.changed().await.ok()?;
            let next = {
                let state = self.state_rx.borrow_and_update();
                (self.select)(&*state)
            };
            if next != self.current {
                self.current = next.clone();
                return Some(next);
            }
        }
    }
}
