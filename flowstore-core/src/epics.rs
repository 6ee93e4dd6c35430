//! Keyed registry for long-lived epic tasks
//!
//! An epic is a long-lived process that consumes the action stream and
//! dispatches further actions as a reactive side effect (countdown
//! timers, watchers, pollers). The registry owns the task handles so
//! epics can be replaced, cancelled individually, or torn down
//! transitively when their owner goes away.

use std::collections::HashMap;
use std::future::Future;

use tokio::task::JoinHandle;

/// Identifies an epic for replacement and cancellation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EpicKey(String);

impl EpicKey {
    /// Create a new epic key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for EpicKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EpicKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Owns running epic tasks, keyed for mutual exclusion.
///
/// Spawning under a key that is already running cancels the existing
/// task first, so at most one epic per key is ever alive. Epics talk
/// back through whatever bus clone their future captured.
#[derive(Default)]
pub struct Epics {
    handles: HashMap<EpicKey, JoinHandle<()>>,
}

impl Epics {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Spawn an epic, cancelling any existing epic with the same key.
    pub fn spawn<F>(&mut self, key: impl Into<EpicKey>, future: F) -> &mut Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);
        self.handles.insert(key, tokio::spawn(future));
        self
    }

    /// Cancel an epic by key. No-op when the key is unknown.
    pub fn cancel(&mut self, key: &EpicKey) {
        if let Some(handle) = self.handles.remove(key) {
            handle.abort();
        }
    }

    /// Cancel every running epic.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    /// Whether an epic with the given key is registered.
    pub fn is_active(&self, key: &EpicKey) -> bool {
        self.handles.contains_key(key)
    }

    /// Number of registered epics.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no epics are registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Keys of every registered epic.
    pub fn active_keys(&self) -> impl Iterator<Item = &EpicKey> {
        self.handles.keys()
    }
}

impl Drop for Epics {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}
