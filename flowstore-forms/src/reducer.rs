//! Pure form reducer

use tracing::error;

use flowstore_core::{reducer, FnReducer};

use crate::actions::FormAction;
use crate::types::FormState;

/// Build the form reducer around an initial field snapshot.
///
/// Every case returns a new state value; a snapshot already handed to a
/// subscriber is never mutated by a later fold. Lookups of unknown
/// field names are logged and folded as identity; the `Form`
/// controller refuses them before dispatch, so hitting this path means
/// a raw dispatch bypassed the controller, and corrupting state over it
/// is not an option.
pub fn form_reducer(
    initial: FormState,
) -> FnReducer<FormState, impl Fn(FormState, &FormAction) -> FormState + Send + 'static> {
    let snapshot = initial.clone();
    reducer(initial, move |mut state: FormState, action: &FormAction| {
        match action {
            FormAction::Update { name, value } => match state.get_mut(name) {
                Some(field) => {
                    field.value = value.clone();
                    field.meta.errors.clear();
                }
                None => error!(field = %name, "update for unknown field ignored"),
            },
            FormAction::FieldBlur { field }
            | FormAction::FieldErrorUpdate { field }
            | FormAction::Error { field } => {
                if state.contains_key(&field.name) {
                    state.insert(field.name.clone(), field.clone());
                } else {
                    error!(field = %field.name, "result for unknown field ignored");
                }
            }
            FormAction::FieldFocus { name } => match state.get_mut(name) {
                Some(field) => field.meta.touched = true,
                None => error!(field = %name, "focus for unknown field ignored"),
            },
            FormAction::Errors(next) => state = next.clone(),
            FormAction::FormSubmit(next) => state = next.clone(),
            FormAction::FormReset => state = snapshot.clone(),
            FormAction::FormInitialize(fields) => {
                state = fields
                    .iter()
                    .cloned()
                    .map(|field| (field.name.clone(), field))
                    .collect();
            }
        }
        state
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use flowstore_core::Reduce;

    use super::*;
    use crate::actions::field_update;
    use crate::types::{Field, Rule};

    fn initial() -> FormState {
        [
            Field::new("username", json!("")),
            Field::new("email", json!("")).requires(Rule::new("email is required", |v| {
                v.as_str().is_some_and(|s| !s.is_empty())
            })),
        ]
        .into_iter()
        .map(|field| (field.name.clone(), field))
        .collect()
    }

    #[test]
    fn test_update_sets_value_and_clears_errors() {
        let reduce = form_reducer(initial());
        let mut state = reduce.initial();
        state["username"].meta.errors.push("stale".into());

        let state = reduce.reduce(state, &field_update("username", json!("ada")));
        assert_eq!(state["username"].value, json!("ada"));
        assert!(state["username"].meta.errors.is_empty());
    }

    #[test]
    fn test_update_unknown_field_is_identity() {
        let reduce = form_reducer(initial());
        let before = reduce.initial();
        let after = reduce.reduce(before.clone(), &field_update("nope", json!("x")));
        assert_eq!(before, after);
    }

    #[test]
    fn test_focus_marks_touched() {
        let reduce = form_reducer(initial());
        let state = reduce.reduce(
            reduce.initial(),
            &FormAction::FieldFocus {
                name: "username".into(),
            },
        );
        assert!(state["username"].meta.touched);
    }

    #[test]
    fn test_error_update_replaces_field() {
        let reduce = form_reducer(initial());
        let mut validated = reduce.initial()["email"].clone();
        validated.meta.errors.push("email is required".into());
        validated.meta.touched = true;

        let state = reduce.reduce(
            reduce.initial(),
            &FormAction::FieldErrorUpdate { field: validated },
        );
        assert_eq!(state["email"].meta.errors, vec!["email is required".to_string()]);
        assert!(state["email"].meta.touched);
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let reduce = form_reducer(initial());
        let dirty = reduce.reduce(reduce.initial(), &field_update("username", json!("ada")));
        assert_eq!(dirty["username"].value, json!("ada"));

        let state = reduce.reduce(dirty, &FormAction::FormReset);
        assert_eq!(state, reduce.initial());
    }

    #[test]
    fn test_initialize_replaces_declared_fields() {
        let reduce = form_reducer(initial());
        let state = reduce.reduce(
            reduce.initial(),
            &FormAction::FormInitialize(vec![Field::new("token", json!("abc"))]),
        );
        assert_eq!(state.len(), 1);
        assert_eq!(state["token"].value, json!("abc"));
    }

    #[test]
    fn test_new_snapshots_do_not_alias_old_ones() {
        let reduce = form_reducer(initial());
        let before = reduce.initial();
        let after = reduce.reduce(before.clone(), &field_update("username", json!("ada")));

        // Mutating the new snapshot never retroactively changes the old one.
        assert_eq!(before["username"].value, json!(""));
        assert_eq!(after["username"].value, json!("ada"));
    }
}
