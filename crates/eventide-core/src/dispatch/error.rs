//! Error types for event dispatch.
//!
//! Two layers of failure exist here:
//!
//! - [`EventError`]: what a listener *signals* when it cannot process an
//!   event — a recoverable, expected failure mode, distinct from a
//!   programming defect (which surfaces as a panic and is contained by the
//!   broker separately).
//! - [`DispatchError`]: what a dispatch call returns when the active policy
//!   is `Throw` — a typed error carrying the original cause.

use std::error::Error as StdError;

use thiserror::Error;

/// Failure explicitly signaled by a listener.
///
/// Carries a message and, optionally, the underlying cause.
///
/// # Example
///
/// ```
/// use eventide_core::EventError;
///
/// let plain = EventError::new("index unavailable");
/// assert_eq!(plain.message(), "index unavailable");
///
/// let io = std::io::Error::other("disk on fire");
/// let chained = EventError::with_cause("could not persist projection", io);
/// assert!(std::error::Error::source(&chained).is_some());
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EventError {
    message: String,
    #[source]
    cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl EventError {
    /// Create an event error with a message and no cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create an event error wrapping an underlying cause.
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// The human-readable failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error returned by `dispatch`/`dispatch_all` when a listener failure is
/// not absorbed by the active error policy.
///
/// The queue keeps whatever events were still pending when the failure
/// propagated; a later dispatch call drains them alongside the new event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A listener signaled an event-level failure under the `Throw` policy.
    #[error("listener `{listener}` failed while handling {event}")]
    ListenerFailed {
        /// Name of the failing listener.
        listener: String,
        /// Debug rendering of the event being handled.
        event: String,
        /// The failure the listener signaled.
        #[source]
        source: EventError,
    },

    /// A listener panicked under the `Throw` policy.
    #[error("listener `{listener}` panicked while handling {event}: {panic}")]
    ListenerPanicked {
        /// Name of the panicking listener.
        listener: String,
        /// Debug rendering of the event being handled.
        event: String,
        /// Rendered panic payload.
        panic: String,
    },
}

impl DispatchError {
    /// Name of the listener that caused the dispatch to abort.
    pub fn listener(&self) -> &str {
        match self {
            Self::ListenerFailed { listener, .. } => listener,
            Self::ListenerPanicked { listener, .. } => listener,
        }
    }

    /// Debug rendering of the event that was being handled.
    pub fn event(&self) -> &str {
        match self {
            Self::ListenerFailed { event, .. } => event,
            Self::ListenerPanicked { event, .. } => event,
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
