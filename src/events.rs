//! Observer registration: event kinds, subscription handles, and the listener registry.
//!
//! Hosts keep one [`ListenerRegistry`] per event source. Subscribing returns a
//! [`Subscription`] handle; unsubscribing with a handle that is already gone is
//! a no-op. Dispatch works on a snapshot of the matching listeners so a
//! listener may subscribe or unsubscribe while it is being called.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::rc::Rc;

use crate::surface::{LayerId, MapSurface};

/// Notification kinds a map surface emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    /// The viewport panned or was resized.
    Move,
    /// The view was reset, e.g. after a zoom change.
    ViewReset,
    /// A clickable layer was clicked.
    Click,
}

/// A notification delivered to map surface listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    Move,
    ViewReset,
    Click { layer: LayerId },
}

impl MapEvent {
    #[must_use]
    pub fn kind(&self) -> MapEventKind {
        match self {
            Self::Move => MapEventKind::Move,
            Self::ViewReset => MapEventKind::ViewReset,
            Self::Click { .. } => MapEventKind::Click,
        }
    }
}

/// Callback invoked by a map surface during dispatch.
///
/// The surface hands itself back so the listener can read the viewport and
/// add or remove layers without holding a reference of its own.
pub type MapListener = Rc<dyn Fn(&mut dyn MapSurface, &MapEvent)>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Entry<K, L> {
    id: Subscription,
    kind: K,
    listener: L,
}

/// Ordered listener list keyed by event kind.
pub struct ListenerRegistry<K, L> {
    next_id: u64,
    entries: Vec<Entry<K, L>>,
}

impl<K, L> Default for ListenerRegistry<K, L> {
    fn default() -> Self {
        Self { next_id: 1, entries: Vec::new() }
    }
}

impl<K: Copy + Eq, L: Clone> ListenerRegistry<K, L> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`. Listeners fire in registration order.
    pub fn subscribe(&mut self, kind: K, listener: L) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, kind, listener });
        id
    }

    /// Remove a listener. Returns `false` if the handle was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != subscription);
        self.entries.len() != before
    }

    /// Snapshot of the listeners registered for `kind`, in registration order.
    #[must_use]
    pub fn listeners_for(&self, kind: K) -> Vec<L> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.listener.clone())
            .collect()
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn count(&self, kind: K) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
