//! Event dispatch: broker, queue disciplines, listener contract, and
//! failure policies.
//!
//! # Architecture
//!
//! ```text
//! EventBroker (owns the queue)
//!    │
//!    ├── OrderingStrategy: Fifo | Lifo | Priority  (where enqueues land)
//!    ├── ListenerLocator: listeners_for(TypeId)    (who handles what)
//!    └── ErrorPolicy × 2: event / runtime          (what failures do)
//!
//! dispatch(e) ─► enqueue ─► drain loop ─► EventContext ─► listeners
//!                              ▲                │
//!                              └──── trigger ───┘
//! ```
//!
//! One drain pass processes the whole queue, including events chained from
//! inside listeners via [`EventContext::trigger`]; the broker is
//! single-flight and refuses to nest drains on the same call path.
//!
//! # Key pieces
//!
//! - [`EventBroker`]: the processor — queue, drain loop, policies
//! - [`OrderingStrategy`] with [`Fifo`], [`Lifo`], [`Priority`]
//! - [`ListenerLocator`] and the manual [`ListenerRegistry`]
//! - [`Listener`] / [`EventContext`]: the invocation contract
//! - [`ErrorPolicy`] / [`FailureKind`] / [`FailureAction`]: the failure
//!   state machine
//! - [`DispatchReport`] / [`AbsorbedFailure`]: the observable outcome
//! - [`LoggingListener`], [`CountingListener`]: built-ins
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use eventide_core::{ErrorPolicy, EventBroker, EventContext, ListenerRegistry};
//!
//! #[derive(Debug)]
//! struct OrderPlaced {
//!     id: u64,
//! }
//! # impl eventide_core::Event for OrderPlaced {
//! #     fn source(&self) -> &(dyn std::any::Any + Send + Sync) { &self.id }
//! #     fn as_any(&self) -> &dyn std::any::Any { self }
//! # }
//!
//! let registry = Arc::new(ListenerRegistry::new());
//! registry.register_fn::<OrderPlaced, _>(|ctx: &EventContext<'_>| {
//!     let order = ctx.event_as::<OrderPlaced>().expect("registered for this type");
//!     tracing::info!(order = order.id, "order placed");
//!     Ok(())
//! });
//!
//! let broker = EventBroker::fifo();
//! broker.set_locator(registry);
//! broker.set_event_error_policy(ErrorPolicy::IgnoreListener);
//!
//! broker.dispatch(OrderPlaced { id: 4711 })?;
//! # Ok::<(), eventide_core::DispatchError>(())
//! ```

pub mod broker;
pub mod builtin;
pub mod context;
pub mod error;
pub mod listener;
pub mod locator;
pub mod policy;
pub mod report;
pub mod strategy;

pub use broker::EventBroker;
pub use builtin::{CountingListener, LoggingListener};
pub use context::EventContext;
pub use error::{DispatchError, DispatchResult, EventError};
pub use listener::{Listener, SharedListener};
pub use locator::{ListenerLocator, ListenerRegistry};
pub use policy::{ErrorPolicy, FailureAction, FailureKind};
pub use report::{AbsorbedFailure, DispatchReport};
pub use strategy::{Fifo, Lifo, OrderingStrategy, Priority};
