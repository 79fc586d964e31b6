//! Observable outcome of a dispatch call.

use super::policy::FailureKind;

/// Summary returned by a dispatch call that did not propagate an error.
///
/// Absorbing error policies make "returned `Ok`" ambiguous between a fully
/// clean drain and one that shed failures along the way; the report
/// resolves that ambiguity without changing the error contract.
#[derive(Debug, Default, Clone)]
pub struct DispatchReport {
    /// Events popped from the queue during this drain (including events
    /// with no listeners, and the event whose failure halted a `Stop`).
    pub events_processed: usize,
    /// Listener invocations attempted, successful or not.
    pub listeners_invoked: usize,
    /// Failures consumed by a non-`Throw` policy, in occurrence order.
    pub absorbed: Vec<AbsorbedFailure>,
    /// Whether a `Stop` policy halted the drain (discarding the rest of
    /// the queue).
    pub halted: bool,
}

impl DispatchReport {
    /// True when every listener completed and the drain ran to the end.
    pub fn is_clean(&self) -> bool {
        self.absorbed.is_empty() && !self.halted
    }
}

/// One listener failure consumed by an absorbing policy.
#[derive(Debug, Clone)]
pub struct AbsorbedFailure {
    /// Which policy field the failure routed through.
    pub kind: FailureKind,
    /// Name of the failing listener.
    pub listener: String,
    /// Debug rendering of the event being handled.
    pub event: String,
    /// The failure's message (event error text, or rendered panic payload).
    pub message: String,
}
