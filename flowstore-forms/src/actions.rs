//! Form action types, constants and thunk builders

use std::sync::Arc;

use async_stream::stream;
use serde_json::Value;

use flowstore_core::{thunk, Action, Dispatch, ThunkFlow};

use crate::helpers::{contains_no_errors, extract_final_values};
use crate::types::{Field, FormState};
use crate::validator::validate;

pub const UPDATE: &str = "@form/UPDATE";
pub const FIELD_BLUR: &str = "@form/FIELD_BLUR";
pub const FIELD_ERROR_UPDATE: &str = "@form/FIELD_ERROR_UPDATE";
pub const ERROR: &str = "@form/ERROR";
pub const FIELD_FOCUS: &str = "@form/FIELD_FOCUS";
pub const ERRORS: &str = "@form/ERRORS";
pub const FORM_RESET: &str = "@form/FORM_RESET";
pub const FORM_SUBMIT: &str = "@form/FORM_SUBMIT";
pub const FORM_INITIALIZE: &str = "@form/FORM_INITIALIZE";

/// Callback invoked with the extracted final values on a clean submit.
pub type SubmitHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Everything the form reducer folds.
#[derive(Clone, Debug, PartialEq)]
pub enum FormAction {
    /// Set a field's value, clearing its stale errors.
    Update { name: String, value: Value },
    /// A field lost focus (carries the touched field snapshot).
    FieldBlur { field: Field },
    /// Validation finished for a field; replaces it wholesale.
    FieldErrorUpdate { field: Field },
    /// Out-of-band error attached to a single field.
    Error { field: Field },
    /// A field gained focus.
    FieldFocus { name: String },
    /// Replace the whole form state (bulk error application).
    Errors(FormState),
    /// Restore the initial snapshot.
    FormReset,
    /// Submit started; carries the snapshot being validated.
    FormSubmit(FormState),
    /// Replace the form with freshly declared fields.
    FormInitialize(Vec<Field>),
}

impl Action for FormAction {
    fn name(&self) -> &'static str {
        match self {
            FormAction::Update { .. } => UPDATE,
            FormAction::FieldBlur { .. } => FIELD_BLUR,
            FormAction::FieldErrorUpdate { .. } => FIELD_ERROR_UPDATE,
            FormAction::Error { .. } => ERROR,
            FormAction::FieldFocus { .. } => FIELD_FOCUS,
            FormAction::Errors(_) => ERRORS,
            FormAction::FormReset => FORM_RESET,
            FormAction::FormSubmit(_) => FORM_SUBMIT,
            FormAction::FormInitialize(_) => FORM_INITIALIZE,
        }
    }
}

/// Update a field's value.
pub fn field_update(name: impl Into<String>, value: Value) -> FormAction {
    FormAction::Update {
        name: name.into(),
        value,
    }
}

/// Mark a field focused.
pub fn field_focus(name: impl Into<String>) -> FormAction {
    FormAction::FieldFocus { name: name.into() }
}

/// Blur a field: marks it touched and, when it declares requirements,
/// runs its validation pipeline.
///
/// Emits `FIELD_BLUR` immediately (with `loading` set while validation
/// is pending), then `FIELD_ERROR_UPDATE` once every rule has produced
/// its verdict. A field without requirements skips validation and is
/// immediately valid.
pub fn field_blur(field: Field) -> Dispatch<FormAction> {
    thunk(move |_bus| {
        let mut blurred = field;
        blurred.meta.touched = true;

        if !blurred.has_requirements() {
            return ThunkFlow::action(FormAction::FieldBlur { field: blurred });
        }

        blurred.meta.loading = true;
        ThunkFlow::stream(stream! {
            yield FormAction::FieldBlur { field: blurred.clone() };
            let validated = validate(blurred).await;
            yield FormAction::FieldErrorUpdate { field: validated };
        })
    })
}

/// Submit a form snapshot.
///
/// Emits `FORM_SUBMIT`, validates every field that declares
/// requirements (sequentially, one `FIELD_ERROR_UPDATE` each) and
/// invokes `on_submit` exactly once iff every declared field produced a
/// clean result. Completion is counted per field identity, so two
/// fields sharing one rule set still count as two results.
pub(crate) fn form_submit(snapshot: FormState, on_submit: SubmitHandler) -> Dispatch<FormAction> {
    thunk(move |_bus| {
        ThunkFlow::stream(stream! {
            yield FormAction::FormSubmit(snapshot.clone());

            let pending: Vec<Field> = snapshot
                .values()
                .filter(|field| field.has_requirements())
                .cloned()
                .collect();
            let declared = pending.len();

            let mut results = Vec::with_capacity(declared);
            for field in pending {
                let validated = validate(field).await;
                results.push(validated.clone());
                yield FormAction::FieldErrorUpdate { field: validated };
            }

            if results.len() == declared && contains_no_errors(&results) {
                on_submit(extract_final_values(&snapshot));
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_action_names_are_namespaced() {
        assert_eq!(field_update("a", json!(1)).name(), "@form/UPDATE");
        assert_eq!(field_focus("a").name(), "@form/FIELD_FOCUS");
        assert_eq!(FormAction::FormReset.name(), "@form/FORM_RESET");
        assert_eq!(
            FormAction::FormSubmit(FormState::new()).name(),
            "@form/FORM_SUBMIT"
        );
    }
}
