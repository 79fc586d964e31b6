//! Entity change feed: wires a registry and a broker, then replays a small
//! stream of entity lifecycle events through three listeners.
//!
//! Run with logging visible:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example entity_feed
//! ```

use std::sync::Arc;

use eventide_core::lifecycle::{EntityCreated, EntityDeleted, EntityEvent, PropertyChanged};
use eventide_core::{
    ErrorPolicy, Event, EventBroker, EventContext, ListenerRegistry, LoggingListener,
};

#[derive(Debug)]
struct User {
    id: u64,
    email: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let registry = Arc::new(ListenerRegistry::new());

    // Observe every entity change, whatever its concrete type.
    registry.register::<EntityEvent>(Arc::new(LoggingListener::new().with_name("audit")));

    // Welcome new users, and chain a property change off the creation.
    registry.register_fn::<EntityCreated<User>, _>(|ctx: &EventContext<'_>| {
        let created = ctx
            .event_as::<EntityCreated<User>>()
            .expect("registered for this type");
        tracing::info!(
            user = created.entity().id,
            email = %created.entity().email,
            "sending welcome mail"
        );
        ctx.trigger(
            PropertyChanged::new(created.entity().id, "status", "active".to_string())
                .with_previous("pending".to_string()),
        );
        Ok(())
    });

    // React to property changes raised above.
    registry.register_fn::<PropertyChanged<u64, String>, _>(|ctx: &EventContext<'_>| {
        let change = ctx
            .event_as::<PropertyChanged<u64, String>>()
            .expect("registered for this type");
        tracing::info!(
            user = change.entity(),
            property = change.property(),
            value = %change.value(),
            "property changed"
        );
        Ok(())
    });

    let broker = EventBroker::fifo();
    broker.set_locator(registry);
    broker.set_event_error_policy(ErrorPolicy::IgnoreListener);

    let events: Vec<Arc<dyn Event>> = vec![
        Arc::new(EntityCreated::new(User {
            id: 1,
            email: "ada@example.com".into(),
        })),
        Arc::new(EntityCreated::new(User {
            id: 2,
            email: "grace@example.com".into(),
        })),
        Arc::new(EntityDeleted::new(User {
            id: 1,
            email: "ada@example.com".into(),
        })),
    ];

    let report = broker.dispatch_all(events)?;
    tracing::info!(
        events = report.events_processed,
        listeners = report.listeners_invoked,
        absorbed = report.absorbed.len(),
        "feed drained"
    );

    Ok(())
}
