//! Form controller: store wiring, submit throttling, field operations

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use flowstore_core::{ActionBus, Store};

use crate::actions::{
    field_blur, field_focus, field_update, form_submit, FormAction, SubmitHandler,
};
use crate::error::FormError;
use crate::reducer::form_reducer;
use crate::types::{Field, FormState};

/// Repeat submits inside this window are dropped, so a storm of rapid
/// clicks triggers at most one submit cycle.
pub const SUBMIT_THROTTLE: Duration = Duration::from_millis(1500);

/// Owns a form's store and drives its operations.
///
/// Field operations check the field exists against the current snapshot
/// and refuse unknown names before anything is dispatched; the reducer
/// guards the same lookups, so even a raw dispatch cannot corrupt the
/// fold.
pub struct Form {
    store: Store<FormState, FormAction>,
    on_submit: SubmitHandler,
    last_submit: Mutex<Option<Instant>>,
}

impl Form {
    /// Declare a form over the given fields.
    ///
    /// Spawns a store on the bus with the form reducer seeded from the
    /// declared fields; `on_submit` runs exactly once per clean submit
    /// cycle with the extracted final values.
    pub fn new<F>(bus: &ActionBus<FormAction>, fields: Vec<Field>, on_submit: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let initial: FormState = fields
            .into_iter()
            .map(|field| (field.name.clone(), field))
            .collect();
        let store = Store::spawn(bus, form_reducer(initial));
        Self {
            store,
            on_submit: Arc::new(on_submit),
            last_submit: Mutex::new(None),
        }
    }

    /// The underlying store, for selectors and raw subscriptions.
    pub fn store(&self) -> &Store<FormState, FormAction> {
        &self.store
    }

    /// Current form snapshot.
    pub fn state(&self) -> FormState {
        self.store.state()
    }

    fn field(&self, name: &str) -> Result<Field, FormError> {
        self.store
            .state()
            .get(name)
            .cloned()
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Set a field's value; stale errors on the field are cleared.
    pub fn update(&self, name: &str, value: Value) -> Result<(), FormError> {
        self.field(name)?;
        self.store.dispatch(field_update(name, value));
        Ok(())
    }

    /// Mark a field focused.
    pub fn focus(&self, name: &str) -> Result<(), FormError> {
        self.field(name)?;
        self.store.dispatch(field_focus(name));
        Ok(())
    }

    /// Blur a field, running its validation pipeline when it declares
    /// requirements.
    pub fn blur(&self, name: &str) -> Result<(), FormError> {
        let field = self.field(name)?;
        self.store.dispatch(field_blur(field));
        Ok(())
    }

    /// Restore the initial snapshot.
    pub fn reset(&self) {
        self.store.dispatch(FormAction::FormReset);
    }

    /// Replace the form with freshly declared fields.
    pub fn initialize(&self, fields: Vec<Field>) {
        self.store.dispatch(FormAction::FormInitialize(fields));
    }

    /// Start a submit cycle over the current snapshot.
    ///
    /// Returns `false` when the call lands inside the throttle window
    /// and was dropped. An accepted submit validates every field with
    /// requirements and invokes the submit handler only when all of
    /// them come back clean; errors stay visible on `meta.errors`.
    pub fn submit(&self) -> bool {
        let mut last = self.last_submit.lock();
        if let Some(previous) = *last {
            if previous.elapsed() < SUBMIT_THROTTLE {
                debug!("submit throttled");
                return false;
            }
        }
        *last = Some(Instant::now());
        drop(last);

        let snapshot = self.store.state();
        self.store
            .dispatch(form_submit(snapshot, Arc::clone(&self.on_submit)));
        true
    }

    /// Stop the form's fold. The bus keeps accepting dispatches.
    pub fn shutdown(&self) {
        self.store.shutdown();
    }
}
