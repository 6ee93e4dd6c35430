//! Reducer composition: flat reducers, slice maps and initial state
//!
//! Reducers here are pure `(State, &Action) -> State` functions. Unlike
//! stores that let reducers mutate shared entries in place, a flowstore
//! reducer always returns a new state value; a snapshot handed to a
//! subscriber is never changed retroactively by a later fold.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::action::Action;

/// A state-transition source foldable by a [`Store`](crate::store::Store).
///
/// `initial` produces the zero-action state computed once at store
/// construction; `reduce` folds one action into the running state and
/// must be deterministic given `(state, action)`.
pub trait Reduce<A: Action>: Send + 'static {
    /// The state value owned by the fold.
    type State: Clone + Send + Sync + 'static;

    /// State before any action has been folded.
    fn initial(&self) -> Self::State;

    /// Fold a single action, returning the next state.
    fn reduce(&self, state: Self::State, action: &A) -> Self::State;
}

/// Adapt a plain closure into a flat reducer.
///
/// # Example
///
/// ```ignore
/// let counter = reducer(0i64, |count, action: &CounterAction| match action {
///     CounterAction::Increment => count + 1,
///     CounterAction::Decrement => count - 1,
/// });
/// let store = Store::spawn(&bus, counter);
/// ```
pub fn reducer<S, A, F>(initial: S, f: F) -> FnReducer<S, F>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
    F: Fn(S, &A) -> S + Send + 'static,
{
    FnReducer { initial, f }
}

/// A flat reducer built from a closure; see [`reducer`].
pub struct FnReducer<S, F> {
    initial: S,
    f: F,
}

impl<S, A, F> Reduce<A> for FnReducer<S, F>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
    F: Fn(S, &A) -> S + Send + 'static,
{
    type State = S;

    fn initial(&self) -> S {
        self.initial.clone()
    }

    fn reduce(&self, state: S, action: &A) -> S {
        (self.f)(state, action)
    }
}

struct Slice<A> {
    initial: Value,
    reduce: Box<dyn Fn(Value, &A) -> Value + Send + Sync + 'static>,
}

/// A map of per-slice reducers over dynamic JSON state.
///
/// Composite state is a JSON object with one entry per slice, in
/// insertion order. Every action is delivered to every slice reducer on
/// every fold step; slice reducers ignore unrelated action types by
/// returning their state unchanged.
///
/// Initial composite state is the union of each slice's zero-action
/// value, deep-merged with caller-supplied overrides (overrides win on
/// key conflicts).
///
/// # Example
///
/// ```ignore
/// let reducers = SliceMap::new()
///     .slice("session", json!({ "user": null }), session_reducer)
///     .slice("settings", json!({ "theme": "dark" }), settings_reducer)
///     .with_overrides(json!({ "settings": { "theme": "light" } }));
/// let store = Store::spawn(&bus, reducers);
/// ```
pub struct SliceMap<A> {
    slices: IndexMap<String, Slice<A>>,
    overrides: Option<Value>,
}

impl<A: Action> SliceMap<A> {
    /// Create an empty slice map.
    pub fn new() -> Self {
        Self {
            slices: IndexMap::new(),
            overrides: None,
        }
    }

    /// Register a slice reducer with its zero-action state.
    ///
    /// Registering a slice under an existing name replaces it.
    pub fn slice<F>(mut self, name: impl Into<String>, initial: Value, reduce: F) -> Self
    where
        F: Fn(Value, &A) -> Value + Send + Sync + 'static,
    {
        self.slices.insert(
            name.into(),
            Slice {
                initial,
                reduce: Box::new(reduce),
            },
        );
        self
    }

    /// Deep-merge caller-supplied state over the slices' zero-action
    /// output. Override keys win on conflict.
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = Some(overrides);
        self
    }
}

impl<A: Action> Default for SliceMap<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> Reduce<A> for SliceMap<A> {
    type State = Value;

    fn initial(&self) -> Value {
        let mut zero = Map::new();
        for (name, slice) in &self.slices {
            zero.insert(name.clone(), slice.initial.clone());
        }
        let mut state = Value::Object(zero);
        if let Some(overrides) = &self.overrides {
            deep_merge(&mut state, overrides.clone());
        }
        state
    }

    fn reduce(&self, state: Value, action: &A) -> Value {
        let mut map = match state {
            Value::Object(map) => map,
            // Composite state is always an object; anything else gets
            // rebuilt from the slices.
            _ => Map::new(),
        };
        for (name, slice) in &self.slices {
            let prev = map
                .remove(name.as_str())
                .unwrap_or_else(|| slice.initial.clone());
            map.insert(name.clone(), (slice.reduce)(prev, action));
        }
        Value::Object(map)
    }
}

/// Recursively merge `overlay` into `base`; overlay wins on conflicts,
/// objects merge key-by-key.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Login(String),
        SetTheme(String),
        Unrelated,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Login(_) => "@test/LOGIN",
                TestAction::SetTheme(_) => "@test/SET_THEME",
                TestAction::Unrelated => "@test/UNRELATED",
            }
        }
    }

    fn session_map() -> SliceMap<TestAction> {
        SliceMap::new()
            .slice("session", json!({ "user": null }), |mut state, action| {
                if let TestAction::Login(user) = action {
                    state["user"] = json!(user);
                }
                state
            })
            .slice("settings", json!({ "theme": "dark" }), |mut state, action| {
                if let TestAction::SetTheme(theme) = action {
                    state["theme"] = json!(theme);
                }
                state
            })
    }

    #[test]
    fn test_fn_reducer_folds() {
        let counter = reducer(0i64, |count, action: &TestAction| match action {
            TestAction::Login(_) => count + 1,
            _ => count,
        });

        assert_eq!(counter.initial(), 0);
        let next = counter.reduce(0, &TestAction::Login("ada".into()));
        assert_eq!(next, 1);
        assert_eq!(counter.reduce(next, &TestAction::Unrelated), 1);
    }

    #[test]
    fn test_slice_map_initial_is_union_of_zero_states() {
        let state = session_map().initial();
        assert_eq!(
            state,
            json!({
                "session": { "user": null },
                "settings": { "theme": "dark" },
            })
        );
    }

    #[test]
    fn test_slice_map_overrides_win_on_conflict() {
        let state = session_map()
            .with_overrides(json!({
                "settings": { "theme": "light" },
                "extra": true,
            }))
            .initial();

        assert_eq!(state["settings"]["theme"], json!("light"));
        // Non-conflicting zero-state keys survive the merge.
        assert_eq!(state["session"]["user"], json!(null));
        // Override-only keys are kept in the composite.
        assert_eq!(state["extra"], json!(true));
    }

    #[test]
    fn test_slice_map_delivers_action_to_every_slice() {
        let map = session_map();
        let state = map.initial();

        let state = map.reduce(state, &TestAction::Login("ada".into()));
        assert_eq!(state["session"]["user"], json!("ada"));
        assert_eq!(state["settings"]["theme"], json!("dark"));

        let state = map.reduce(state, &TestAction::SetTheme("light".into()));
        assert_eq!(state["session"]["user"], json!("ada"));
        assert_eq!(state["settings"]["theme"], json!("light"));
    }

    #[test]
    fn test_slice_map_unhandled_action_is_identity() {
        let map = session_map();
        let before = map.initial();
        let after = map.reduce(before.clone(), &TestAction::Unrelated);
        assert_eq!(before, after);
    }

    #[test]
    fn test_deep_merge_nested_objects() {
        let mut base = json!({ "a": { "x": 1, "y": 2 }, "b": 3 });
        deep_merge(&mut base, json!({ "a": { "y": 20, "z": 30 }, "c": 4 }));
        assert_eq!(
            base,
            json!({ "a": { "x": 1, "y": 20, "z": 30 }, "b": 3, "c": 4 })
        );
    }

    #[test]
    fn test_deep_merge_scalar_replaces() {
        let mut base = json!({ "a": { "x": 1 } });
        deep_merge(&mut base, json!({ "a": 5 }));
        assert_eq!(base, json!({ "a": 5 }));
    }
}
