//! Listener lookup.
//!
//! The broker never owns listeners; it asks a [`ListenerLocator`] for the
//! listeners registered against a type key. Concrete locators backed by
//! dependency-injection containers, component trees, or introspection live
//! outside this crate — the one implementation shipped here,
//! [`ListenerRegistry`], is the explicit manual-registration map.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use parking_lot::RwLock;

use super::context::EventContext;
use super::error::EventError;
use super::listener::{Listener, SharedListener};

/// Resolves the listeners registered against an exact type key.
///
/// The broker walks an event's lineage itself and queries the locator once
/// per key, so implementations do not handle supertypes.
///
/// Lookups must be deterministic: repeated calls for the same key within
/// the same broker generation must return the same listeners in the same
/// order. A locator with nondeterministic order is invalid.
pub trait ListenerLocator: Send + Sync {
    /// Listeners for exactly this type key, in registration order.
    /// May be empty.
    fn listeners_for(&self, event_type: TypeId) -> Vec<SharedListener>;
}

/// Manual-registration locator: an insertion-ordered map from type key to
/// listener list.
///
/// Keys are ordinary `'static` types — concrete event types, or ancestor
/// keys referenced from an event's lineage.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use eventide_core::{CountingListener, ListenerRegistry};
///
/// #[derive(Debug)]
/// struct Ping;
/// # impl eventide_core::Event for Ping {
/// #     fn source(&self) -> &(dyn std::any::Any + Send + Sync) { &() }
/// #     fn as_any(&self) -> &dyn std::any::Any { self }
/// # }
///
/// let registry = ListenerRegistry::new();
/// registry.register::<Ping>(Arc::new(CountingListener::new()));
/// ```
#[derive(Default)]
pub struct ListenerRegistry {
    by_type: RwLock<HashMap<TypeId, Vec<SharedListener>>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the type key `K`.
    ///
    /// Listeners registered for the same key are invoked in registration
    /// order. Registering the same listener twice delivers each event to
    /// it twice.
    pub fn register<K: Any>(&self, listener: SharedListener) {
        self.by_type
            .write()
            .entry(TypeId::of::<K>())
            .or_default()
            .push(listener);
    }

    /// Register a closure as a listener for the type key `K`.
    pub fn register_fn<K, F>(&self, handler: F)
    where
        K: Any,
        F: Fn(&EventContext<'_>) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.register::<K>(std::sync::Arc::new(handler));
    }

    /// Number of listeners registered across all keys.
    pub fn listener_count(&self) -> usize {
        self.by_type.read().values().map(Vec::len).sum()
    }
}

impl ListenerLocator for ListenerRegistry {
    fn listeners_for(&self, event_type: TypeId) -> Vec<SharedListener> {
        self.by_type
            .read()
            .get(&event_type)
            .map(|listeners| listeners.clone())
            .unwrap_or_default()
    }
}
