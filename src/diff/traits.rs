//! The generic normalized-map reconcile primitive.
//!
//! Both comparators walk two [`NormalizedMap`]s the same way and only differ
//! in the events they emit. A [`ChangeComputer`] supplies those events; the
//! walk itself lives in [`reconcile`].

use crate::model::NormalizedMap;

/// Strategy for turning map membership into change events.
pub trait ChangeComputer {
    /// The normalized resource stored in the maps.
    type Resource;
    /// The event type produced.
    type Event;

    /// A resource present only in the source map.
    fn added(&self, id: &str, resource: &Self::Resource, events: &mut Vec<Self::Event>);

    /// A resource present only in the destination map.
    fn removed(&self, id: &str, resource: &Self::Resource, events: &mut Vec<Self::Event>);

    /// A resource present on both sides. Emits nothing when they are equal.
    fn matched(
        &self,
        id: &str,
        source: &Self::Resource,
        destination: &Self::Resource,
        events: &mut Vec<Self::Event>,
    );

    /// Get the name of this change computer for logging/debugging.
    fn name(&self) -> &str;
}

/// Reconcile two maps in two passes.
///
/// The first pass walks the source in iteration order and reports additions
/// and matches; the second walks the destination and reports removals.
/// Events of one resource are therefore always adjacent.
pub fn reconcile<C: ChangeComputer>(
    computer: &C,
    source: &NormalizedMap<C::Resource>,
    destination: &NormalizedMap<C::Resource>,
) -> Vec<C::Event> {
    let mut events = Vec::new();

    for (id, resource) in source {
        match destination.get(id) {
            None => computer.added(id, resource, &mut events),
            Some(other) => computer.matched(id, resource, other, &mut events),
        }
    }
    for (id, resource) in destination {
        if !source.contains_key(id) {
            computer.removed(id, resource, &mut events);
        }
    }

    tracing::debug!("{}: {} event(s)", computer.name(), events.len());
    events
}
