//! The event broker: queue ownership and the drain loop.
//!
//! [`EventBroker`] is the stateful dispatcher at the center of this crate.
//! Producers submit events through [`dispatch`](EventBroker::dispatch) /
//! [`dispatch_all`](EventBroker::dispatch_all); the broker enqueues them
//! under its ordering strategy and drains the queue one event at a time,
//! resolving listeners through the configured [`ListenerLocator`] and
//! invoking each inside an [`EventContext`].
//!
//! ```text
//! Producers (many):                    Listeners (located per event):
//!   dispatch(e) ──┐
//!   dispatch_all ─┼─► queue ─► drain ─► ctx ─► listener 1..n
//!                 │     ▲                │
//!                 │     └── trigger ─────┘   (chained events join the
//!                 └── ordering strategy       same drain pass)
//! ```
//!
//! # Single-flight draining
//!
//! The whole enqueue+drain cycle runs inside one reentrant critical
//! section. Concurrent callers from other threads block until the in-flight
//! drain finishes; a listener that calls `dispatch` directly on the same
//! call path is detected by the `draining` flag and silently no-opped (with
//! a WARN diagnostic) instead of recursing — chained work belongs in
//! [`EventContext::trigger`].
//!
//! # Failure handling
//!
//! Each listener invocation is fenced: an `Err` return is an event-level
//! failure, a panic is a runtime failure, and each routes through its own
//! [`ErrorPolicy`]. Only `Throw` reaches the caller; everything else is
//! logged, recorded in the [`DispatchReport`], and recovered locally.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use eventide_core::{EventBroker, ListenerRegistry, LoggingListener};
//! use eventide_core::lifecycle::{EntityCreated, EntityEvent};
//!
//! let registry = Arc::new(ListenerRegistry::new());
//! registry.register::<EntityEvent>(Arc::new(LoggingListener::new()));
//!
//! let broker = EventBroker::fifo();
//! broker.set_locator(registry);
//!
//! let report = broker.dispatch(EntityCreated::new("user-17"))?;
//! assert_eq!(report.events_processed, 1);
//! # Ok::<(), eventide_core::DispatchError>(())
//! ```

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::ReentrantMutex;

use super::context::EventContext;
use super::error::{DispatchError, DispatchResult, EventError};
use super::listener::SharedListener;
use super::locator::ListenerLocator;
use super::policy::{ErrorPolicy, FailureAction, FailureKind};
use super::report::{AbsorbedFailure, DispatchReport};
use super::strategy::{Fifo, Lifo, OrderingStrategy, Priority};
use crate::event::Event;

/// Stateful event dispatcher owning a queue and its drain loop.
///
/// Constructed once per application scope, configured with a locator
/// before first use, and shared freely (`&self` API throughout). Holds no
/// event-specific state between dispatch cycles: the queue is empty at
/// rest.
pub struct EventBroker {
    strategy: Box<dyn OrderingStrategy>,
    inner: ReentrantMutex<Inner>,
}

/// Everything behind the broker's critical section.
///
/// `draining` sits outside the `RefCell` so re-entry detection never
/// contends with a state borrow.
struct Inner {
    draining: Cell<bool>,
    state: RefCell<BrokerState>,
}

struct BrokerState {
    queue: VecDeque<Arc<dyn Event>>,
    locator: Option<Arc<dyn ListenerLocator>>,
    event_policy: ErrorPolicy,
    runtime_policy: ErrorPolicy,
    /// Exact type + ancestors, resolved once per concrete event type.
    lineage_cache: HashMap<TypeId, Arc<[TypeId]>>,
}

impl EventBroker {
    /// Create a broker with a custom ordering strategy.
    pub fn with_strategy(strategy: Box<dyn OrderingStrategy>) -> Self {
        Self {
            strategy,
            inner: ReentrantMutex::new(Inner {
                draining: Cell::new(false),
                state: RefCell::new(BrokerState {
                    queue: VecDeque::new(),
                    locator: None,
                    event_policy: ErrorPolicy::default(),
                    runtime_policy: ErrorPolicy::default(),
                    lineage_cache: HashMap::new(),
                }),
            }),
        }
    }

    /// Broker that processes events in submission order.
    pub fn fifo() -> Self {
        Self::with_strategy(Box::new(Fifo))
    }

    /// Broker that processes the newest event first.
    pub fn lifo() -> Self {
        Self::with_strategy(Box::new(Lifo))
    }

    /// Broker that processes events by descending priority.
    pub fn prioritized() -> Self {
        Self::with_strategy(Box::new(Priority))
    }

    /// Replace the locator used for subsequent lookups.
    ///
    /// Must be called before the first dispatch; until then, dispatching
    /// is a safe no-op that logs a diagnostic and invokes nothing.
    pub fn set_locator(&self, locator: Arc<dyn ListenerLocator>) {
        let inner = self.inner.lock();
        inner.state.borrow_mut().locator = Some(locator);
    }

    /// Policy applied when a listener signals an event-level failure.
    ///
    /// Safe to call at any time; takes effect on the next listener
    /// invocation. Defaults to [`ErrorPolicy::Throw`].
    pub fn set_event_error_policy(&self, policy: ErrorPolicy) {
        let inner = self.inner.lock();
        inner.state.borrow_mut().event_policy = policy;
    }

    /// Policy applied when listener code fails in any other way (panics).
    ///
    /// Safe to call at any time; takes effect on the next listener
    /// invocation. Defaults to [`ErrorPolicy::Throw`].
    pub fn set_runtime_error_policy(&self, policy: ErrorPolicy) {
        let inner = self.inner.lock();
        inner.state.borrow_mut().runtime_policy = policy;
    }

    /// Enqueue one event, then drain the queue.
    ///
    /// Returns the drain's [`DispatchReport`], or a [`DispatchError`] if a
    /// listener failure was not absorbed by the active policy — in which
    /// case events still queued remain pending and a later dispatch call
    /// drains them.
    pub fn dispatch(&self, event: impl Event) -> DispatchResult<DispatchReport> {
        self.dispatch_shared(Arc::new(event))
    }

    /// [`dispatch`](Self::dispatch) for an event that is already shared.
    pub fn dispatch_shared(&self, event: Arc<dyn Event>) -> DispatchResult<DispatchReport> {
        let inner = self.inner.lock();
        if inner.draining.get() {
            tracing::warn!(
                event = ?event,
                "re-entrant dispatch ignored; chain events through EventContext::trigger"
            );
            return Ok(DispatchReport::default());
        }
        self.strategy
            .enqueue(&mut inner.state.borrow_mut().queue, event);
        self.drain(&inner)
    }

    /// Enqueue a batch of events, then drain once.
    ///
    /// Events are enqueued in the given order, subject to the ordering
    /// strategy's own placement; the queue sees them as one logical batch.
    pub fn dispatch_all(
        &self,
        events: impl IntoIterator<Item = Arc<dyn Event>>,
    ) -> DispatchResult<DispatchReport> {
        let inner = self.inner.lock();
        if inner.draining.get() {
            tracing::warn!(
                "re-entrant dispatch_all ignored; chain events through EventContext::trigger"
            );
            return Ok(DispatchReport::default());
        }
        {
            let mut state = inner.state.borrow_mut();
            for event in events {
                self.strategy.enqueue(&mut state.queue, event);
            }
        }
        self.drain(&inner)
    }

    /// Enqueue from an [`EventContext`]: joins the drain in flight instead
    /// of starting a new one.
    pub(crate) fn enqueue_chained(&self, event: Arc<dyn Event>) {
        // Reentrant lock: the drain loop on this call path already holds it.
        let inner = self.inner.lock();
        self.strategy
            .enqueue(&mut inner.state.borrow_mut().queue, event);
    }

    /// Pop-and-invoke until the queue is empty.
    fn drain(&self, inner: &Inner) -> DispatchResult<DispatchReport> {
        let _guard = DrainGuard::arm(&inner.draining);
        let mut report = DispatchReport::default();

        loop {
            let event = match inner.state.borrow_mut().queue.pop_front() {
                Some(event) => event,
                None => break,
            };
            report.events_processed += 1;

            let listeners = self.resolve_listeners(inner, event.as_ref());
            let context = EventContext::new(&event, self);

            'listeners: for listener in &listeners {
                report.listeners_invoked += 1;

                // No RefCell borrow is held across this call: listeners may
                // re-lock through trigger (or a stray dispatch) freely.
                let failure = match panic::catch_unwind(AssertUnwindSafe(|| {
                    listener.on_event(&context)
                })) {
                    Ok(Ok(())) => continue,
                    Ok(Err(error)) => Failure::Event(error),
                    Err(payload) => Failure::Runtime(panic_message(payload)),
                };

                let policy = {
                    let state = inner.state.borrow();
                    match failure.kind() {
                        FailureKind::Event => state.event_policy,
                        FailureKind::Runtime => state.runtime_policy,
                    }
                };

                match policy.action() {
                    FailureAction::Propagate => {
                        tracing::debug!(
                            listener = %listener.name(),
                            event = ?event,
                            %policy,
                            "listener failure propagating to dispatch caller"
                        );
                        return Err(failure.into_dispatch_error(listener.name(), &event));
                    }
                    FailureAction::Halt => {
                        let dropped = {
                            let mut state = inner.state.borrow_mut();
                            let dropped = state.queue.len();
                            state.queue.clear();
                            dropped
                        };
                        tracing::warn!(
                            listener = %listener.name(),
                            event = ?event,
                            dropped,
                            "stop policy halted dispatch; pending events discarded"
                        );
                        report.absorbed.push(failure.absorbed(listener.name(), &event));
                        report.halted = true;
                        return Ok(report);
                    }
                    FailureAction::SkipEvent => {
                        tracing::warn!(
                            listener = %listener.name(),
                            event = ?event,
                            failure = %failure.message(),
                            "listener failed; abandoning remaining listeners for this event"
                        );
                        report.absorbed.push(failure.absorbed(listener.name(), &event));
                        break 'listeners;
                    }
                    FailureAction::SkipListener => {
                        tracing::warn!(
                            listener = %listener.name(),
                            event = ?event,
                            failure = %failure.message(),
                            "listener failed; continuing with next listener"
                        );
                        report.absorbed.push(failure.absorbed(listener.name(), &event));
                    }
                }
            }
        }

        Ok(report)
    }

    /// Listeners for the event's exact type, then its ancestors,
    /// most-derived first, in locator-returned order at each level.
    fn resolve_listeners(&self, inner: &Inner, event: &dyn Event) -> Vec<SharedListener> {
        let locator = match inner.state.borrow().locator.clone() {
            Some(locator) => locator,
            None => {
                tracing::warn!(
                    event = ?event,
                    "no listener locator configured; event processed without listeners"
                );
                return Vec::new();
            }
        };

        let chain = self.lineage_of(inner, event);
        let mut listeners = Vec::new();
        for type_id in chain.iter() {
            listeners.extend(locator.listeners_for(*type_id));
        }
        listeners
    }

    /// Cached [exact type, ancestors...] chain for the event's concrete
    /// type; built from [`Event::lineage`] on first encounter. Duplicate
    /// entries in a declared lineage are dropped.
    fn lineage_of(&self, inner: &Inner, event: &dyn Event) -> Arc<[TypeId]> {
        let exact = event.event_type();
        if let Some(chain) = inner.state.borrow().lineage_cache.get(&exact) {
            return Arc::clone(chain);
        }

        let mut chain = vec![exact];
        for ancestor in event.lineage() {
            if !chain.contains(&ancestor) {
                chain.push(ancestor);
            }
        }
        let chain: Arc<[TypeId]> = chain.into();
        inner
            .state
            .borrow_mut()
            .lineage_cache
            .insert(exact, Arc::clone(&chain));
        chain
    }
}

impl fmt::Debug for EventBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBroker")
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}

/// Arms the `draining` flag for the lifetime of one drain; disarming lives
/// in `Drop` so every exit path — including `Throw` propagation — resets
/// the flag.
struct DrainGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DrainGuard<'a> {
    fn arm(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// One listener failure, before policy resolution.
enum Failure {
    Event(EventError),
    Runtime(String),
}

impl Failure {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Event(_) => FailureKind::Event,
            Self::Runtime(_) => FailureKind::Runtime,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Event(error) => error.to_string(),
            Self::Runtime(panic) => panic.clone(),
        }
    }

    fn absorbed(&self, listener: &str, event: &Arc<dyn Event>) -> AbsorbedFailure {
        AbsorbedFailure {
            kind: self.kind(),
            listener: listener.to_string(),
            event: format!("{event:?}"),
            message: self.message(),
        }
    }

    fn into_dispatch_error(self, listener: &str, event: &Arc<dyn Event>) -> DispatchError {
        match self {
            Self::Event(source) => DispatchError::ListenerFailed {
                listener: listener.to_string(),
                event: format!("{event:?}"),
                source,
            },
            Self::Runtime(panic) => DispatchError::ListenerPanicked {
                listener: listener.to_string(),
                event: format!("{event:?}"),
                panic,
            },
        }
    }
}

/// Best-effort rendering of a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
