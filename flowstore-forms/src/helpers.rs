//! Submit helpers: error aggregation and final value extraction

use serde_json::{Map, Value};

use crate::types::{Field, FormState};

/// Whether an accumulated set of validated fields carries no errors.
pub fn contains_no_errors(fields: &[Field]) -> bool {
    fields.iter().all(|field| field.meta.errors.is_empty())
}

/// Collect the values handed to a successful submit callback.
///
/// Empty and null values are dropped; booleans are always kept (an
/// unchecked checkbox is still a submitted value). Dotted field names
/// build nested objects: `"profile.age"` lands at
/// `{ "profile": { "age": ... } }`.
pub fn extract_final_values(state: &FormState) -> Value {
    let mut values = Map::new();
    for field in state.values() {
        if keep_value(&field.value) {
            assign_path(&mut values, &field.name, field.value.clone());
        }
    }
    Value::Object(values)
}

fn keep_value(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Insert `value` at a dotted `path`, creating intermediate objects.
/// A non-object intermediate is replaced; the last path segment wins.
pub fn assign_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Some(nested) = entry.as_object_mut() {
                assign_path(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form_state(fields: Vec<Field>) -> FormState {
        fields
            .into_iter()
            .map(|field| (field.name.clone(), field))
            .collect()
    }

    #[test]
    fn test_contains_no_errors() {
        let mut clean = Field::new("a", json!("x"));
        let mut dirty = Field::new("b", json!("y"));
        dirty.meta.errors.push("bad".into());

        assert!(contains_no_errors(&[clean.clone()]));
        assert!(!contains_no_errors(&[clean.clone(), dirty.clone()]));

        clean.meta.errors.clear();
        dirty.meta.errors.clear();
        assert!(contains_no_errors(&[clean, dirty]));
    }

    #[test]
    fn test_extract_skips_empty_values_keeps_booleans() {
        let state = form_state(vec![
            Field::new("username", json!("ada")),
            Field::new("nickname", json!("")),
            Field::new("newsletter", json!(false)),
            Field::new("age", json!(36)),
        ]);

        assert_eq!(
            extract_final_values(&state),
            json!({ "username": "ada", "newsletter": false, "age": 36 })
        );
    }

    #[test]
    fn test_extract_builds_nested_objects_from_dotted_names() {
        let state = form_state(vec![
            Field::new("profile.name", json!("ada")),
            Field::new("profile.links.home", json!("https://example.com")),
            Field::new("plan", json!("pro")),
        ]);

        assert_eq!(
            extract_final_values(&state),
            json!({
                "profile": {
                    "name": "ada",
                    "links": { "home": "https://example.com" },
                },
                "plan": "pro",
            })
        );
    }

    #[test]
    fn test_assign_path_replaces_non_object_intermediate() {
        let mut target = Map::new();
        assign_path(&mut target, "a", json!(1));
        assign_path(&mut target, "a.b", json!(2));
        assert_eq!(Value::Object(target), json!({ "a": { "b": 2 } }));
    }
}
