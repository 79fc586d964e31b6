//! Queue ordering strategies.
//!
//! A strategy decides where a newly enqueued event goes; the broker's drain
//! loop always pops from the head. Three disciplines are provided:
//!
//! - [`Fifo`]: submission order.
//! - [`Lifo`]: newest first — freshly chained events run before older
//!   pending ones, giving depth-first reaction chains.
//! - [`Priority`]: descending [`priority()`](crate::event::Event::priority),
//!   stable among equals.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::event::Event;

/// Decides where a newly enqueued event goes.
///
/// Implementations only ever *insert*; removal is the drain loop's job.
pub trait OrderingStrategy: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Place `event` into `queue`.
    fn enqueue(&self, queue: &mut VecDeque<Arc<dyn Event>>, event: Arc<dyn Event>);
}

/// First-in-first-out: append to the tail.
///
/// Preserves submission order. Chained events are appended after whatever
/// is already queued, so they run after currently-pending siblings.
pub struct Fifo;

impl OrderingStrategy for Fifo {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn enqueue(&self, queue: &mut VecDeque<Arc<dyn Event>>, event: Arc<dyn Event>) {
        queue.push_back(event);
    }
}

/// Last-in-first-out: push to the head.
///
/// The newest event — including freshly chained ones — runs next, before
/// older pending events.
pub struct Lifo;

impl OrderingStrategy for Lifo {
    fn name(&self) -> &'static str {
        "lifo"
    }

    fn enqueue(&self, queue: &mut VecDeque<Arc<dyn Event>>, event: Arc<dyn Event>) {
        queue.push_front(event);
    }
}

/// Priority order: descending priority, stable among equals.
///
/// Every enqueue re-sorts the full queue. The sort is stable, so events of
/// equal priority keep their relative insertion order — FIFO among equals.
/// Events that do not expose the priority capability sort last.
pub struct Priority;

impl OrderingStrategy for Priority {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn enqueue(&self, queue: &mut VecDeque<Arc<dyn Event>>, event: Arc<dyn Event>) {
        queue.push_back(event);
        queue
            .make_contiguous()
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
    }
}
