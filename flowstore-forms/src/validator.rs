//! Sequential rule pipeline for a single field

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::warn;

use crate::types::Field;

/// Run every requirement against the field's current value, in
/// declaration order, accumulating the message of each failing rule.
///
/// A rule that panics counts as failed: it surfaces as a field error
/// rather than tearing down the validation pipeline, so one broken rule
/// never hides the results of the others. Clears `loading` when done.
pub async fn validate(mut field: Field) -> Field {
    let mut errors = Vec::new();
    for rule in &field.requirements {
        // Lazy block so a panic in the rule body (sync or async) lands
        // inside catch_unwind.
        let checked = AssertUnwindSafe(async { rule.run(&field.value).await });
        match checked.catch_unwind().await {
            Ok(true) => {}
            Ok(false) => errors.push(rule.message().to_string()),
            Err(_) => {
                warn!(
                    field = %field.name,
                    rule = rule.message(),
                    "validation rule panicked; recorded as failed"
                );
                errors.push(rule.message().to_string());
            }
        }
    }
    field.meta.errors = errors;
    field.meta.loading = false;
    field
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::Rule;

    fn required() -> Rule {
        Rule::new("value is required", |v| {
            v.as_str().is_some_and(|s| !s.is_empty())
        })
    }

    fn min_len(n: usize) -> Rule {
        Rule::new("value is too short", move |v| {
            v.as_str().is_some_and(|s| s.len() >= n)
        })
    }

    #[tokio::test]
    async fn test_passing_rules_leave_no_errors() {
        let field = Field::new("username", json!("ada"))
            .requires(required())
            .requires(min_len(2));

        let validated = validate(field).await;
        assert!(validated.meta.errors.is_empty());
        assert!(!validated.meta.loading);
    }

    #[tokio::test]
    async fn test_failures_accumulate_in_rule_order() {
        let field = Field::new("username", json!(""))
            .requires(required())
            .requires(min_len(2));

        let validated = validate(field).await;
        assert_eq!(
            validated.meta.errors,
            vec!["value is required".to_string(), "value is too short".to_string()]
        );
    }

    #[tokio::test]
    async fn test_async_rule_failure_is_recorded() {
        let field = Field::new("email", json!("taken@example.com")).requires(Rule::async_fn(
            "email is taken",
            |v| async move { v.as_str() != Some("taken@example.com") },
        ));

        let validated = validate(field).await;
        assert_eq!(validated.meta.errors, vec!["email is taken".to_string()]);
    }

    #[tokio::test]
    async fn test_panicking_rule_counts_as_failed_without_stopping() {
        let field = Field::new("username", json!("ada"))
            .requires(Rule::new("broken rule", |_| panic!("rule blew up")))
            .requires(min_len(2));

        let validated = validate(field).await;
        // The broken rule failed, the rule after it still ran clean.
        assert_eq!(validated.meta.errors, vec!["broken rule".to_string()]);
    }

    #[tokio::test]
    async fn test_validation_clears_stale_errors() {
        let mut field = Field::new("username", json!("ada")).requires(required());
        field.meta.errors.push("stale".into());

        let validated = validate(field).await;
        assert!(validated.meta.errors.is_empty());
    }
}
