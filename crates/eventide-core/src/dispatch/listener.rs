//! The listener contract.
//!
//! A listener is any unit of behavior invoked with an [`EventContext`] when
//! a matching event is dispatched. It either completes, signals an
//! event-level failure by returning [`EventError`], or fails unexpectedly
//! by panicking — the broker routes each outcome through the matching
//! error policy.
//!
//! Closures of the right shape are listeners too:
//!
//! ```
//! use std::sync::Arc;
//! use eventide_core::{EventContext, EventError, SharedListener};
//!
//! let listener: SharedListener = Arc::new(
//!     |ctx: &EventContext<'_>| -> Result<(), EventError> {
//!         tracing::debug!(event = ?ctx.event(), "observed");
//!         Ok(())
//!     },
//! );
//! # let _ = listener;
//! ```

use std::sync::Arc;

use super::context::EventContext;
use super::error::EventError;

/// Unit of behavior invoked for each matching event.
///
/// Listeners must never call the broker's top-level dispatch entry point
/// from inside `on_event`; chained events go through
/// [`EventContext::trigger`], which joins the drain already in flight.
pub trait Listener: Send + Sync {
    /// Name used in diagnostics, error messages, and dispatch reports.
    fn name(&self) -> &str;

    /// Handle one event.
    ///
    /// Returning `Err` signals an event-level failure and routes through
    /// the broker's event error policy; panicking routes through its
    /// runtime error policy.
    fn on_event(&self, ctx: &EventContext<'_>) -> Result<(), EventError>;
}

/// Shared handle to a listener, as stored by locators.
pub type SharedListener = Arc<dyn Listener>;

impl<F> Listener for F
where
    F: Fn(&EventContext<'_>) -> Result<(), EventError> + Send + Sync,
{
    fn name(&self) -> &str {
        std::any::type_name::<F>()
    }

    fn on_event(&self, ctx: &EventContext<'_>) -> Result<(), EventError> {
        self(ctx)
    }
}
