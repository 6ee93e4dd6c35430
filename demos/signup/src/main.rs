//! Signup - headless flowstore-forms walkthrough
//!
//! Demonstrates the form pipeline end to end:
//! - Fields: declared with validation rules
//! - Blur: runs a field's rules, errors land on `meta.errors`
//! - Submit: validates everything, calls the handler only when clean
//!
//! Run with `RUST_LOG=debug` to watch actions fold.

use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flowstore::forms::{Field, Form, Rule};
use flowstore::ActionBus;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bus = ActionBus::new();
    let (submitted_tx, mut submitted_rx) = tokio::sync::mpsc::unbounded_channel();

    let form = Form::new(
        &bus,
        vec![
            Field::new("username", json!(""))
                .requires(Rule::new("username is required", |v| {
                    v.as_str().is_some_and(|s| !s.is_empty())
                }))
                .requires(Rule::async_fn("username is taken", |v| async move {
                    // Stand-in for a uniqueness lookup.
                    tokio::time::sleep(Duration::from_millis(150)).await;
                    v.as_str() != Some("admin")
                })),
            Field::new("email", json!("")).requires(Rule::new("email looks wrong", |v| {
                v.as_str().is_some_and(|s| s.contains('@'))
            })),
            Field::new("profile.newsletter", json!(true)),
        ],
        move |values| {
            let _ = submitted_tx.send(values);
        },
    );

    // First attempt: taken username, broken email.
    form.update("username", json!("admin"))?;
    form.blur("username")?;
    form.update("email", json!("not-an-email"))?;
    form.blur("email")?;
    tokio::time::sleep(Duration::from_millis(300)).await;

    for field in form.state().values() {
        info!(
            field = %field.name,
            errors = ?field.meta.errors,
            "after blur"
        );
    }

    form.submit();
    tokio::time::sleep(Duration::from_millis(300)).await;
    info!("first submit blocked by validation errors");

    // Fix the values and submit again, past the throttle window.
    form.update("username", json!("ada"))?;
    form.update("email", json!("ada@example.com"))?;
    tokio::time::sleep(Duration::from_millis(1600)).await;
    form.submit();

    let values = submitted_rx
        .recv()
        .await
        .expect("submit handler dropped");
    info!(%values, "signup accepted");

    form.shutdown();
    Ok(())
}
