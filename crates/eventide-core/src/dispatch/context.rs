//! Per-dispatch event context.

use std::sync::Arc;

use super::broker::EventBroker;
use crate::event::Event;

/// Capsule handed to each listener invocation.
///
/// Built fresh for every event popped from the queue and scoped to exactly
/// one listener-invocation pass over that event. It exposes two
/// capabilities: reading the current event, and chaining new events into
/// the drain already in flight.
///
/// `trigger` feeds straight into the broker's enqueue operation — not into
/// `dispatch` — so chained events join the *same* drain pass instead of
/// starting a nested one.
pub struct EventContext<'a> {
    event: &'a Arc<dyn Event>,
    broker: &'a EventBroker,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(event: &'a Arc<dyn Event>, broker: &'a EventBroker) -> Self {
        Self { event, broker }
    }

    /// The event currently being dispatched.
    pub fn event(&self) -> &dyn Event {
        self.event.as_ref()
    }

    /// The current event downcast to a concrete type.
    ///
    /// Returns `None` when the event is of a different type — the usual
    /// case for listeners registered on an ancestor key.
    pub fn event_as<E: Event>(&self) -> Option<&E> {
        self.event.as_any().downcast_ref::<E>()
    }

    /// Enqueue a new event into the current drain pass.
    ///
    /// Under FIFO ordering the chained event runs after whatever is already
    /// queued; under LIFO it runs next; under priority ordering it takes
    /// its sorted place. Either way it is processed before the surrounding
    /// dispatch call returns.
    pub fn trigger(&self, event: impl Event) {
        self.broker.enqueue_chained(Arc::new(event));
    }

    /// Enqueue an already-shared event into the current drain pass.
    pub fn trigger_shared(&self, event: Arc<dyn Event>) {
        self.broker.enqueue_chained(event);
    }
}
