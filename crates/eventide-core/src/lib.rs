//! eventide-core: an in-process event dispatch engine.
//!
//! Producers raise typed events; a broker drains them through a queue with
//! a configurable ordering discipline and invokes the listeners a locator
//! resolves for each event's type — including listeners registered for the
//! event's declared ancestors. Two error policies decide what a failing
//! listener does to the rest of the drain.
//!
//! This is a synchronous, call-stack-bound dispatch primitive: one
//! process, one address space, no durability, no transport. Listener
//! invocation is a direct blocking call and a whole dispatch — including
//! every event chained from inside listeners — completes before the call
//! returns.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use eventide_core::{EventBroker, EventContext, ListenerRegistry};
//! use eventide_core::lifecycle::{EntityCreated, EntityEvent};
//!
//! // Locate listeners by explicit registration.
//! let registry = Arc::new(ListenerRegistry::new());
//!
//! // Exact-type listener: only creation events for &str entities.
//! registry.register_fn::<EntityCreated<&str>, _>(|ctx: &EventContext<'_>| {
//!     let created = ctx.event_as::<EntityCreated<&str>>().expect("exact type");
//!     tracing::info!(entity = %created.entity(), "created");
//!     Ok(())
//! });
//!
//! // Ancestor listener: every entity lifecycle event.
//! registry.register_fn::<EntityEvent, _>(|ctx: &EventContext<'_>| {
//!     tracing::debug!(event = ?ctx.event(), "entity changed");
//!     Ok(())
//! });
//!
//! let broker = EventBroker::fifo();
//! broker.set_locator(registry);
//!
//! let report = broker.dispatch(EntityCreated::new("user-17"))?;
//! assert_eq!(report.listeners_invoked, 2);
//! # Ok::<(), eventide_core::DispatchError>(())
//! ```
//!
//! # Modules
//!
//! - [`event`]: the [`Event`] trait — source payload, lineage, priority
//! - [`dispatch`]: broker, ordering strategies, locator contract, error
//!   policies, and the dispatch report
//! - [`lifecycle`]: ready-made entity change events

pub mod dispatch;
pub mod event;
pub mod lifecycle;

pub use dispatch::{
    AbsorbedFailure, CountingListener, DispatchError, DispatchReport, DispatchResult,
    ErrorPolicy, EventBroker, EventContext, EventError, FailureAction, FailureKind, Fifo, Lifo,
    Listener, ListenerLocator, ListenerRegistry, LoggingListener, OrderingStrategy, Priority,
    SharedListener,
};
pub use event::{Event, MIN_PRIORITY};
