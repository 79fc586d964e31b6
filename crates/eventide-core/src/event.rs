//! The core event contract.
//!
//! An event is an immutable notification value: it carries the datum that
//! caused it (its *source*) and is matched to listeners by its concrete
//! runtime type. Event types may additionally declare a [*lineage*] — an
//! explicit, finite chain of ancestor type keys — so that a listener
//! registered for an ancestor receives dispatch for any descendant event.
//!
//! # Lineage
//!
//! Rust has no type inheritance, so the supertype relationship the broker
//! broadcasts over is declared rather than reflected: an event type lists
//! the [`TypeId`]s of its ancestors, most-derived first. Ancestor keys are
//! ordinary `'static` types used purely for listener registration; an
//! uninhabited enum works well for an "abstract" ancestor that can never be
//! dispatched itself:
//!
//! ```
//! use std::any::{Any, TypeId};
//! use eventide_core::Event;
//!
//! /// Ancestor key: never constructed, only registered against.
//! enum Alert {}
//!
//! #[derive(Debug)]
//! struct DiskFull {
//!     mount: String,
//! }
//!
//! impl Event for DiskFull {
//!     fn source(&self) -> &(dyn Any + Send + Sync) {
//!         &self.mount
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn lineage(&self) -> Vec<TypeId> {
//!         vec![TypeId::of::<Alert>()]
//!     }
//! }
//! ```
//!
//! A listener registered for `Alert` now observes every `DiskFull`, while a
//! listener registered for `DiskFull` observes only that concrete type.
//!
//! [*lineage*]: Event::lineage

use std::any::{Any, TypeId};
use std::fmt;

/// Priority assumed for events that do not expose the priority capability.
///
/// Priority-ordered brokers service higher values sooner; an event type
/// that leaves [`Event::priority`] unimplemented sorts behind everything
/// that sets one.
pub const MIN_PRIORITY: i32 = i32::MIN;

/// Contract implemented by every dispatchable event.
///
/// Events must be:
/// - `'static` (implied by [`Any`]): no borrowed data
/// - `Send + Sync`: a broker may be shared across threads
/// - `Debug`: events appear in diagnostics and error messages
///
/// Events are immutable once constructed. They carry no identity beyond
/// their concrete type and payload; the dispatch machinery never compares
/// or deduplicates them.
pub trait Event: Any + Send + Sync + fmt::Debug {
    /// The datum that triggered this event.
    fn source(&self) -> &(dyn Any + Send + Sync);

    /// Upcast for downcasting to the concrete event type.
    ///
    /// Implementations return `self`.
    fn as_any(&self) -> &dyn Any;

    /// The concrete runtime type of this event, used for listener lookup.
    fn event_type(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Ancestor type keys, most-derived first.
    ///
    /// Listeners registered for any key in the chain receive this event in
    /// addition to listeners registered for the exact type. The chain is
    /// resolved once per concrete type and cached by the broker, so this
    /// method only runs on the first dispatch of each event type.
    ///
    /// Defaults to no ancestors.
    fn lineage(&self) -> Vec<TypeId> {
        Vec::new()
    }

    /// The priority capability, consumed by priority-ordered brokers.
    ///
    /// Higher values are serviced sooner. Defaults to [`MIN_PRIORITY`],
    /// i.e. "no priority": events that do not override this run after
    /// everything that does.
    fn priority(&self) -> i32 {
        MIN_PRIORITY
    }
}
