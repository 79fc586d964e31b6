//! Built-in listeners for common patterns.
//!
//! Reusable listeners that can be registered with any locator. These serve
//! as examples and building blocks for custom listeners.
//!
//! - [`LoggingListener`]: logs every delivery (debug level)
//! - [`CountingListener`]: counts deliveries

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::context::EventContext;
use super::error::EventError;
use super::listener::Listener;

// ============================================================================
// LoggingListener - logs every delivery
// ============================================================================

/// Listener that logs each event delivered to it.
///
/// Useful for debugging and audit trails. Register it against an ancestor
/// key to observe a whole family of events.
///
/// # Example
///
/// ```
/// use eventide_core::LoggingListener;
///
/// let listener = LoggingListener::new().with_name("audit:entities");
/// # let _ = listener;
/// ```
pub struct LoggingListener {
    name: String,
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingListener {
    /// Create a logging listener with the default name.
    pub fn new() -> Self {
        Self {
            name: "builtin:logging".to_string(),
        }
    }

    /// Set a custom name for this listener.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Listener for LoggingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, ctx: &EventContext<'_>) -> Result<(), EventError> {
        tracing::debug!(
            listener = %self.name,
            event = ?ctx.event(),
            "Event received"
        );
        Ok(())
    }
}

// ============================================================================
// CountingListener - counts deliveries
// ============================================================================

/// Listener that counts how many events were delivered to it.
///
/// The counter is shared: clone it via [`counter()`](Self::counter) for
/// external monitoring, or read it directly with
/// [`count()`](Self::count).
pub struct CountingListener {
    name: String,
    delivered: Arc<AtomicU64>,
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingListener {
    /// Create a counting listener with the default name.
    pub fn new() -> Self {
        Self {
            name: "builtin:counting".to_string(),
            delivered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Set a custom name for this listener.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Total deliveries observed so far.
    pub fn count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Clone of the underlying counter for external monitoring.
    pub fn counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.delivered)
    }
}

impl Listener for CountingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, _ctx: &EventContext<'_>) -> Result<(), EventError> {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
