//! Host map surface contract and an in-memory reference surface.
//!
//! [`MapSurface`] is everything an overlay needs from the map it sits on:
//! viewport size, world <-> screen conversion, a layer store, a rotation
//! capability and event subscription. [`PlaneMap`] implements it over a flat
//! world plane with a pan/zoom [`Camera`]. It is the surface used by hosts
//! that render the layer list themselves, and by the tests.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use uuid::Uuid;

use crate::camera::{Camera, Point};
use crate::events::{ListenerRegistry, MapEvent, MapEventKind, MapListener, Subscription};
use crate::marker::{Icon, Rotation};

/// Unique identifier for a layer on a surface.
pub type LayerId = Uuid;

/// Visual element stored in a surface's layer set.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerElement {
    /// World position of the icon anchor.
    pub position: Point,
    pub icon: Icon,
    pub opacity: f64,
    pub clickable: bool,
    /// World point the element stands for, if any.
    pub reference: Option<Point>,
    /// Last rotation applied through [`MapSurface::apply_rotation`].
    pub rotation: Option<Rotation>,
}

impl MarkerElement {
    /// Whether a screen point falls inside the icon box, given the element's
    /// screen-space anchor position.
    #[must_use]
    pub fn contains(&self, anchor_screen: Point, screen: Point) -> bool {
        let anchor = self.icon.anchor();
        let left = anchor_screen.x - anchor.x;
        let top = anchor_screen.y - anchor.y;
        screen.x >= left && screen.x <= left + self.icon.width && screen.y >= top && screen.y <= top + self.icon.height
    }
}

/// What an overlay needs from the map it is attached to.
pub trait MapSurface {
    /// Viewport size in pixels, as `(width, height)`.
    fn size(&self) -> Point;

    /// Convert a world point to viewport pixels.
    fn world_to_screen(&self, world: Point) -> Point;

    /// Convert viewport pixels to a world point.
    fn screen_to_world(&self, screen: Point) -> Point;

    fn add_layer(&mut self, element: MarkerElement) -> LayerId;

    /// Returns `false` if the layer was not present.
    fn remove_layer(&mut self, layer: LayerId) -> bool;

    /// Returns `false` if the layer was not present.
    fn set_layer_position(&mut self, layer: LayerId, position: Point) -> bool;

    /// Rotate a layer's element about its own centre.
    ///
    /// Hosts render this however their platform allows, e.g. with
    /// [`Rotation::css`] or [`Rotation::matrix`]. Returns `false` if the layer
    /// was not present.
    fn apply_rotation(&mut self, layer: LayerId, rotation: Rotation) -> bool;

    /// Centre the view on a world point, keeping the zoom.
    fn pan_to(&mut self, center: Point);

    fn subscribe(&mut self, kind: MapEventKind, listener: MapListener) -> Subscription;

    /// Returns `false` if the subscription was already gone.
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}

/// Something that can be placed on and taken off a [`MapSurface`].
pub trait MapOverlay {
    fn attach_to(&mut self, surface: &mut dyn MapSurface);
    fn detach(&mut self, surface: &mut dyn MapSurface);
    fn is_attached(&self) -> bool;
}

/// Flat world plane viewed through a pan/zoom camera.
pub struct PlaneMap {
    camera: Camera,
    width: f64,
    height: f64,
    /// Insertion order is paint order; the last layer is on top.
    layers: Vec<(LayerId, MarkerElement)>,
    listeners: ListenerRegistry<MapEventKind, MapListener>,
}

impl PlaneMap {
    /// Create a surface with the given viewport size. Negative sizes are treated as zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            camera: Camera::default(),
            width: width.max(0.0),
            height: height.max(0.0),
            layers: Vec::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Viewport centre in screen pixels.
    #[must_use]
    pub fn center_screen(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// World point currently at the viewport centre.
    #[must_use]
    pub fn center(&self) -> Point {
        self.camera.screen_to_world(self.center_screen())
    }

    #[must_use]
    pub fn layer(&self, layer: LayerId) -> Option<&MarkerElement> {
        self.layers.iter().find(|(id, _)| *id == layer).map(|(_, element)| element)
    }

    /// Layers in paint order.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &MarkerElement)> {
        self.layers.iter().map(|(id, element)| (*id, element))
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.listeners.count(kind)
    }

    /// Pan by a screen-space offset and notify `Move` listeners.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.camera.pan_by(dx, dy);
        self.fire(MapEvent::Move);
    }

    /// Zoom about the viewport centre and notify `ViewReset` listeners.
    pub fn set_zoom(&mut self, zoom: f64) {
        let anchor = self.center_screen();
        self.camera.zoom_about(anchor, zoom);
        self.fire(MapEvent::ViewReset);
    }

    /// Change the viewport size and notify `Move` listeners.
    ///
    /// The camera keeps its pan, so the top-left corner stays put.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.fire(MapEvent::Move);
    }

    /// Dispatch a click at a screen point to the topmost clickable layer under it.
    ///
    /// Returns the clicked layer, after `Click` listeners have run.
    pub fn click(&mut self, screen: Point) -> Option<LayerId> {
        let hit = self
            .layers
            .iter()
            .rev()
            .find(|(_, element)| element.clickable && element.contains(self.camera.world_to_screen(element.position), screen))
            .map(|(id, _)| *id)?;
        tracing::trace!(%hit, "layer clicked");
        self.fire(MapEvent::Click { layer: hit });
        Some(hit)
    }

    fn fire(&mut self, event: MapEvent) {
        for listener in self.listeners.listeners_for(event.kind()) {
            listener(&mut *self, &event);
        }
    }

    fn element_mut(&mut self, layer: LayerId) -> Option<&mut MarkerElement> {
        self.layers.iter_mut().find(|(id, _)| *id == layer).map(|(_, element)| element)
    }
}

impl MapSurface for PlaneMap {
    fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn world_to_screen(&self, world: Point) -> Point {
        self.camera.world_to_screen(world)
    }

    fn screen_to_world(&self, screen: Point) -> Point {
        self.camera.screen_to_world(screen)
    }

    fn add_layer(&mut self, element: MarkerElement) -> LayerId {
        let id = Uuid::new_v4();
        tracing::trace!(%id, x = element.position.x, y = element.position.y, "layer added");
        self.layers.push((id, element));
        id
    }

    fn remove_layer(&mut self, layer: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|(id, _)| *id != layer);
        let removed = self.layers.len() != before;
        if removed {
            tracing::trace!(id = %layer, "layer removed");
        }
        removed
    }

    fn set_layer_position(&mut self, layer: LayerId, position: Point) -> bool {
        let Some(element) = self.element_mut(layer) else {
            return false;
        };
        element.position = position;
        true
    }

    fn apply_rotation(&mut self, layer: LayerId, rotation: Rotation) -> bool {
        let Some(element) = self.element_mut(layer) else {
            return false;
        };
        element.rotation = Some(rotation);
        true
    }

    fn pan_to(&mut self, center: Point) {
        let screen = self.center_screen();
        self.camera.look_at(center, screen);
        self.fire(MapEvent::Move);
    }

    fn subscribe(&mut self, kind: MapEventKind, listener: MapListener) -> Subscription {
        self.listeners.subscribe(kind, listener)
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.listeners.unsubscribe(subscription)
    }
}
