//! Binding an edge indicator to a movable map object.
//!
//! Any type implementing [`BindableObject`] gets
//! [`BindEdgeIndicator::bind_edge_indicator`]: it creates an indicator that
//! tracks the object's position, follows the object's `Moved` notifications
//! and is destroyed by its `Removed` notification. [`PointObject`] is a plain
//! movable point that implements the contract.

#[cfg(test)]
#[path = "bind_test.rs"]
mod bind_test;

use std::rc::Rc;

use crate::camera::Point;
use crate::config::{ConfigError, EdgeIndicatorOptions};
use crate::events::{ListenerRegistry, Subscription};
use crate::indicator::EdgeIndicator;
use crate::surface::MapSurface;

/// Notification kinds a bindable object emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectEventKind {
    Moved,
    Removed,
}

/// A notification delivered to object listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectEvent {
    /// The object now sits at `position` (world coordinates).
    Moved { position: Point },
    /// The object was taken off the map.
    Removed,
}

impl ObjectEvent {
    #[must_use]
    pub fn kind(&self) -> ObjectEventKind {
        match self {
            Self::Moved { .. } => ObjectEventKind::Moved,
            Self::Removed => ObjectEventKind::Removed,
        }
    }
}

/// Callback invoked when a bindable object emits an event.
pub type ObjectListener = Rc<dyn Fn(&mut dyn MapSurface, &ObjectEvent)>;

/// Listener registry used by bindable objects.
pub type ObjectListeners = ListenerRegistry<ObjectEventKind, ObjectListener>;

/// An indicator bound to an object, with the object subscriptions that drive it.
pub struct EdgeBinding {
    indicator: EdgeIndicator,
    on_moved: Subscription,
    on_removed: Subscription,
}

impl EdgeBinding {
    #[must_use]
    pub fn indicator(&self) -> &EdgeIndicator {
        &self.indicator
    }
}

/// A map object with a position and move/remove notifications.
pub trait BindableObject {
    /// Current world position.
    fn position(&self) -> Point;

    fn object_listeners(&mut self) -> &mut ObjectListeners;

    /// Storage for the edge binding; `Some` means bound.
    fn edge_binding_slot(&mut self) -> &mut Option<EdgeBinding>;

    fn edge_binding(&self) -> Option<&EdgeBinding>;
}

/// Edge indicator helpers available on every [`BindableObject`].
pub trait BindEdgeIndicator {
    /// Create and attach an indicator tracking this object.
    ///
    /// No-op if already bound, even if the bound indicator has since been
    /// destroyed by a `Removed` notification.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` are invalid; nothing is bound in that case.
    fn bind_edge_indicator(
        &mut self,
        surface: &mut dyn MapSurface,
        options: EdgeIndicatorOptions,
    ) -> Result<&mut Self, ConfigError>;

    /// Detach and drop the bound indicator. No-op if not bound.
    fn unbind_edge_indicator(&mut self, surface: &mut dyn MapSurface) -> &mut Self;
}

impl<T: BindableObject> BindEdgeIndicator for T {
    fn bind_edge_indicator(
        &mut self,
        surface: &mut dyn MapSurface,
        options: EdgeIndicatorOptions,
    ) -> Result<&mut Self, ConfigError> {
        if self.edge_binding().is_some() {
            return Ok(self);
        }

        let indicator = EdgeIndicator::new(Some(self.position()), options)?;
        indicator.add_to(surface);

        let follower = indicator.clone();
        let on_moved = self.object_listeners().subscribe(
            ObjectEventKind::Moved,
            Rc::new(move |surface: &mut dyn MapSurface, event: &ObjectEvent| {
                if let ObjectEvent::Moved { position } = *event {
                    follower.set_target(surface, position);
                }
            }),
        );
        let owner = indicator.clone();
        let on_removed = self.object_listeners().subscribe(
            ObjectEventKind::Removed,
            Rc::new(move |surface: &mut dyn MapSurface, _event: &ObjectEvent| owner.destroy(surface)),
        );

        *self.edge_binding_slot() = Some(EdgeBinding { indicator, on_moved, on_removed });
        tracing::debug!("edge indicator bound");
        Ok(self)
    }

    fn unbind_edge_indicator(&mut self, surface: &mut dyn MapSurface) -> &mut Self {
        let Some(binding) = self.edge_binding_slot().take() else {
            return self;
        };
        let listeners = self.object_listeners();
        listeners.unsubscribe(binding.on_moved);
        listeners.unsubscribe(binding.on_removed);
        binding.indicator.destroy(surface);
        tracing::debug!("edge indicator unbound");
        self
    }
}

/// A movable point on the map.
#[derive(Default)]
pub struct PointObject {
    position: Point,
    listeners: ObjectListeners,
    edge: Option<EdgeBinding>,
}

impl PointObject {
    #[must_use]
    pub fn new(position: Point) -> Self {
        Self { position, listeners: ObjectListeners::new(), edge: None }
    }

    /// Move the point and notify `Moved` listeners.
    pub fn set_position(&mut self, surface: &mut dyn MapSurface, position: Point) {
        self.position = position;
        self.fire(surface, ObjectEvent::Moved { position });
    }

    /// Notify `Removed` listeners.
    pub fn remove(&mut self, surface: &mut dyn MapSurface) {
        self.fire(surface, ObjectEvent::Removed);
    }

    pub fn subscribe(&mut self, kind: ObjectEventKind, listener: ObjectListener) -> Subscription {
        self.listeners.subscribe(kind, listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.listeners.unsubscribe(subscription)
    }

    #[must_use]
    pub fn listener_count(&self, kind: ObjectEventKind) -> usize {
        self.listeners.count(kind)
    }

    fn fire(&self, surface: &mut dyn MapSurface, event: ObjectEvent) {
        for listener in self.listeners.listeners_for(event.kind()) {
            listener(&mut *surface, &event);
        }
    }
}

impl BindableObject for PointObject {
    fn position(&self) -> Point {
        self.position
    }

    fn object_listeners(&mut self) -> &mut ObjectListeners {
        &mut self.listeners
    }

    fn edge_binding_slot(&mut self) -> &mut Option<EdgeBinding> {
        &mut self.edge
    }

    fn edge_binding(&self) -> Option<&EdgeBinding> {
        self.edge.as_ref()
    }
}
