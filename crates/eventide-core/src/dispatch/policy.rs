//! Error policies and the failure decision function.
//!
//! A broker holds two independent [`ErrorPolicy`] fields: one consulted
//! when a listener *signals* a failure ([`FailureKind::Event`]), one
//! consulted when listener code fails in any other way
//! ([`FailureKind::Runtime`], i.e. a panic). Both default to
//! [`ErrorPolicy::Throw`].
//!
//! The mapping from a policy to what the drain loop does next is the pure
//! function [`ErrorPolicy::action`]; it performs no I/O and is the single
//! source of truth for failure control flow.

use std::fmt;

/// What a listener failure does to the rest of the dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the drain and propagate the failure to the dispatch caller.
    /// Events still queued remain pending for a future dispatch call.
    #[default]
    Throw,

    /// Abort silently: stop invoking listeners for this event, discard the
    /// rest of the queue, and return normally.
    Stop,

    /// Abandon the current event (skip its remaining listeners) but keep
    /// draining subsequent queued events.
    IgnoreEvent,

    /// Skip only the failing listener; continue with the next listener for
    /// the same event.
    IgnoreListener,
}

/// Which of the broker's two policy fields a failure routes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The listener explicitly signaled it could not process the event.
    Event,
    /// Listener code failed unexpectedly (panicked).
    Runtime,
}

/// Resolved control-flow decision for one listener failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Return the failure to the dispatch caller.
    Propagate,
    /// Stop the whole drain, quietly.
    Halt,
    /// Move on to the next queued event.
    SkipEvent,
    /// Move on to the next listener for the same event.
    SkipListener,
}

impl ErrorPolicy {
    /// The control-flow decision this policy makes for a failure.
    pub fn action(self) -> FailureAction {
        match self {
            Self::Throw => FailureAction::Propagate,
            Self::Stop => FailureAction::Halt,
            Self::IgnoreEvent => FailureAction::SkipEvent,
            Self::IgnoreListener => FailureAction::SkipListener,
        }
    }

    /// Whether this policy consumes failures instead of propagating them.
    pub fn absorbs(self) -> bool {
        !matches!(self, Self::Throw)
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Throw => write!(f, "throw"),
            Self::Stop => write!(f, "stop"),
            Self::IgnoreEvent => write!(f, "ignore-event"),
            Self::IgnoreListener => write!(f, "ignore-listener"),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_throw() {
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::Throw);
    }

    #[test]
    fn throw_propagates() {
        assert_eq!(ErrorPolicy::Throw.action(), FailureAction::Propagate);
        assert!(!ErrorPolicy::Throw.absorbs());
    }

    #[test]
    fn stop_halts() {
        assert_eq!(ErrorPolicy::Stop.action(), FailureAction::Halt);
        assert!(ErrorPolicy::Stop.absorbs());
    }

    #[test]
    fn ignore_event_skips_the_event() {
        assert_eq!(ErrorPolicy::IgnoreEvent.action(), FailureAction::SkipEvent);
        assert!(ErrorPolicy::IgnoreEvent.absorbs());
    }

    #[test]
    fn ignore_listener_skips_the_listener() {
        assert_eq!(
            ErrorPolicy::IgnoreListener.action(),
            FailureAction::SkipListener
        );
        assert!(ErrorPolicy::IgnoreListener.absorbs());
    }

    #[test]
    fn policies_render_for_diagnostics() {
        assert_eq!(ErrorPolicy::IgnoreListener.to_string(), "ignore-listener");
        assert_eq!(FailureKind::Runtime.to_string(), "runtime");
    }
}
