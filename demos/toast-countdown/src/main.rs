//! Toast countdown - headless flowstore-toasts walkthrough
//!
//! Creates an auto-close toast, hovers it halfway through the countdown
//! to freeze it, then lets it run out and dismiss itself.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flowstore::toasts::{spawn_auto_dismiss, toast_reducer, Position, Toast, ToastAction};
use flowstore::{ActionBus, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bus = ActionBus::new();
    let store = Store::spawn(&bus, toast_reducer());
    let epic = spawn_auto_dismiss(&bus);

    bus.dispatch(ToastAction::Create(Toast::new(
        "welcome",
        Position::TopRight,
        true,
        4000,
    )));

    // Hover after ~1.5s, hold for 2s, then let the countdown finish.
    let hover = tokio::spawn({
        let bus = bus.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            info!("pointer enters toast, countdown freezes");
            bus.dispatch(ToastAction::MouseEnter("welcome".into()));
            tokio::time::sleep(Duration::from_millis(2000)).await;
            info!("pointer leaves toast, countdown resumes");
            bus.dispatch(ToastAction::MouseLeave("welcome".into()));
        }
    });

    let mut states = store.subscribe();
    loop {
        if states.changed().await.is_err() {
            break;
        }
        let toasts = states.borrow_and_update().clone();
        match toasts.first() {
            Some(toast) => info!(id = %toast.id, countdown = ?toast.countdown, "tick"),
            None => {
                info!("toast dismissed itself");
                break;
            }
        }
    }

    hover.await?;
    epic.shutdown();
    Ok(())
}
