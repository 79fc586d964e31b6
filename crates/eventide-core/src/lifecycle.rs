//! Entity lifecycle events.
//!
//! A small family of ready-made events describing changes to some entity:
//! creation, update, deletion, and individual property changes. All four
//! share the ancestor key [`EntityEvent`], so a listener registered for
//! `EntityEvent` observes every entity change regardless of kind, while a
//! listener registered for, say, [`EntityDeleted<User>`](EntityDeleted)
//! observes exactly that.
//!
//! These types also serve as the in-repo demonstration of lineage-based
//! polymorphic broadcast; producers with richer needs define their own
//! hierarchies the same way.

use std::any::{Any, TypeId};

use crate::event::Event;

/// Ancestor key shared by all entity lifecycle events.
///
/// Uninhabited: it can be registered against but never dispatched.
pub enum EntityEvent {}

/// An entity came into existence.
#[derive(Debug)]
pub struct EntityCreated<T> {
    entity: T,
}

impl<T> EntityCreated<T> {
    pub fn new(entity: T) -> Self {
        Self { entity }
    }

    /// The freshly created entity.
    pub fn entity(&self) -> &T {
        &self.entity
    }
}

impl<T> Event for EntityCreated<T>
where
    T: Send + Sync + std::fmt::Debug + 'static,
{
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.entity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Vec<TypeId> {
        vec![TypeId::of::<EntityEvent>()]
    }
}

/// An entity's state changed.
#[derive(Debug)]
pub struct EntityUpdated<T> {
    entity: T,
}

impl<T> EntityUpdated<T> {
    pub fn new(entity: T) -> Self {
        Self { entity }
    }

    /// The entity in its updated state.
    pub fn entity(&self) -> &T {
        &self.entity
    }
}

impl<T> Event for EntityUpdated<T>
where
    T: Send + Sync + std::fmt::Debug + 'static,
{
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.entity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Vec<TypeId> {
        vec![TypeId::of::<EntityEvent>()]
    }
}

/// An entity was removed.
#[derive(Debug)]
pub struct EntityDeleted<T> {
    entity: T,
}

impl<T> EntityDeleted<T> {
    pub fn new(entity: T) -> Self {
        Self { entity }
    }

    /// The entity as it was at deletion time.
    pub fn entity(&self) -> &T {
        &self.entity
    }
}

impl<T> Event for EntityDeleted<T>
where
    T: Send + Sync + std::fmt::Debug + 'static,
{
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.entity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Vec<TypeId> {
        vec![TypeId::of::<EntityEvent>()]
    }
}

/// A single property of an entity changed value.
///
/// Carries the new value and, when the producer knows it, the previous one.
#[derive(Debug)]
pub struct PropertyChanged<T, V> {
    entity: T,
    property: String,
    value: V,
    previous: Option<V>,
}

impl<T, V> PropertyChanged<T, V> {
    pub fn new(entity: T, property: impl Into<String>, value: V) -> Self {
        Self {
            entity,
            property: property.into(),
            value,
            previous: None,
        }
    }

    /// Attach the value the property held before the change.
    pub fn with_previous(mut self, previous: V) -> Self {
        self.previous = Some(previous);
        self
    }

    /// The entity the property belongs to.
    pub fn entity(&self) -> &T {
        &self.entity
    }

    /// Name of the changed property.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The property's new value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The property's previous value, if the producer recorded it.
    pub fn previous(&self) -> Option<&V> {
        self.previous.as_ref()
    }
}

impl<T, V> Event for PropertyChanged<T, V>
where
    T: Send + Sync + std::fmt::Debug + 'static,
    V: Send + Sync + std::fmt::Debug + 'static,
{
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.entity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lineage(&self) -> Vec<TypeId> {
        vec![TypeId::of::<EntityEvent>()]
    }
}
