//! Field, metadata and validation rule types

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;

/// Ordered mapping of field name to field state. Insertion order is the
/// declaration order of the form and is preserved through every fold.
pub type FormState = IndexMap<String, Field>;

/// Validation/interaction metadata attached to a field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meta {
    /// Messages of every failed rule from the latest validation pass.
    pub errors: Vec<String>,
    /// Whether the field has been focused or blurred at least once.
    pub touched: bool,
    /// Whether an async validation pass is currently in flight.
    pub loading: bool,
}

/// A single form field.
#[derive(Clone, Debug)]
pub struct Field {
    /// Unique field name. Dotted names (`"profile.age"`) produce nested
    /// objects in the submitted values.
    pub name: String,
    /// Current value.
    pub value: Value,
    /// Validation rules; a field with none is always considered valid.
    pub requirements: Vec<Rule>,
    /// Interaction and validation metadata.
    pub meta: Meta,
}

impl Field {
    /// Create a field with no requirements.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            requirements: Vec::new(),
            meta: Meta::default(),
        }
    }

    /// Add a validation rule.
    pub fn requires(mut self, rule: Rule) -> Self {
        self.requirements.push(rule);
        self
    }

    /// Whether this field participates in validation.
    pub fn has_requirements(&self) -> bool {
        !self.requirements.is_empty()
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value == other.value
            && self.meta == other.meta
            && self
                .requirements
                .iter()
                .map(Rule::message)
                .eq(other.requirements.iter().map(Rule::message))
    }
}

type RuleCheck = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;

/// A validation rule: a predicate over the field value plus the error
/// message recorded when the predicate fails. Rules are identified by
/// their message.
#[derive(Clone)]
pub struct Rule {
    message: String,
    check: RuleCheck,
}

impl Rule {
    /// Rule from a synchronous predicate.
    ///
    /// # Example
    ///
    /// ```ignore
    /// Rule::new("username is required", |value| {
    ///     value.as_str().is_some_and(|s| !s.is_empty())
    /// })
    /// ```
    pub fn new<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let check: RuleCheck = Arc::new(move |value: Value| {
            let pass = check(&value);
            Box::pin(futures::future::ready(pass)) as BoxFuture<'static, bool>
        });
        Self {
            message: message.into(),
            check,
        }
    }

    /// Rule from an async check (uniqueness lookups, remote policies).
    ///
    /// # Example
    ///
    /// ```ignore
    /// Rule::async_fn("username is taken", |value| async move {
    ///     api::is_available(value.as_str().unwrap_or_default()).await
    /// })
    /// ```
    pub fn async_fn<F, Fut>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let check: RuleCheck =
            Arc::new(move |value: Value| Box::pin(check(value)) as BoxFuture<'static, bool>);
        Self {
            message: message.into(),
            check,
        }
    }

    /// The error message recorded when this rule fails.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn run(&self, value: &Value) -> BoxFuture<'static, bool> {
        (self.check)(value.clone())
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_field_builder() {
        let field = Field::new("email", json!(""))
            .requires(Rule::new("email is required", |v| {
                v.as_str().is_some_and(|s| !s.is_empty())
            }));

        assert_eq!(field.name, "email");
        assert!(field.has_requirements());
        assert!(!field.meta.touched);
        assert!(field.meta.errors.is_empty());
    }

    #[tokio::test]
    async fn test_sync_rule_runs_as_future() {
        let rule = Rule::new("must be positive", |v| v.as_i64().is_some_and(|n| n > 0));
        assert!(rule.run(&json!(3)).await);
        assert!(!rule.run(&json!(-1)).await);
    }

    #[tokio::test]
    async fn test_async_rule() {
        let rule = Rule::async_fn("must be even", |v| async move {
            v.as_i64().is_some_and(|n| n % 2 == 0)
        });
        assert!(rule.run(&json!(4)).await);
        assert!(!rule.run(&json!(5)).await);
    }
}
