//! Edge indicator: points at an off-screen target from the nearest viewport edge.
//!
//! An [`EdgeIndicator`] owns a target world point and listens to its surface's
//! `Move` and `ViewReset` events. Every notification, and every target change,
//! runs the same recompute: drop the current marker, project the target onto
//! the viewport, and if it falls outside, build a fresh [`RotatableMarker`]
//! clamped to the edge, turned toward the viewport centre and optionally faded
//! by how far the target overshoots.
//!
//! The geometry lives in [`compute_placement`], a pure function over screen
//! coordinates, so it can be checked without a surface.

#[cfg(test)]
#[path = "indicator_test.rs"]
mod indicator_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::camera::Point;
use crate::config::{ConfigError, EdgeIndicatorOptions};
use crate::events::{MapEvent, MapEventKind, MapListener, Subscription};
use crate::marker::{MarkerOptions, RotatableMarker};
use crate::surface::{LayerId, MapOverlay, MapSurface};

/// Where and how the edge marker is drawn, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Clamped marker position in viewport pixels.
    pub screen: Point,
    /// Overshoot past the violated bound. Horizontal wins at corners.
    pub distance: f64,
    /// Degrees from the marker toward the viewport centre, 0 without rotation.
    pub angle: f64,
    /// Not clamped to `[0, 1]`. 1 without distance fading.
    pub opacity: f64,
}

/// Compute the marker placement for a target at `target` (viewport pixels).
///
/// Returns `None` unless the target is past some edge of
/// `[0, width] x [0, height]`. A NaN coordinate is past no edge.
#[must_use]
pub fn compute_placement(target: Point, viewport: Point, options: &EdgeIndicatorOptions) -> Option<Placement> {
    let outside = target.y < 0.0 || target.y > viewport.y || target.x > viewport.x || target.x < 0.0;
    if !outside {
        return None;
    }

    let half = options.icon.half_size();
    let mut screen = target;
    let mut distance = 0.0;

    if target.y < 0.0 {
        screen.y = half.y;
        distance = -target.y;
    } else if target.y > viewport.y {
        screen.y = viewport.y - half.y;
        distance = target.y - viewport.y;
    }

    // Evaluated after the vertical pass, so a corner reports horizontal overshoot.
    if target.x > viewport.x {
        screen.x = viewport.x - half.x;
        distance = target.x - viewport.x;
    } else if target.x < 0.0 {
        screen.x = half.x;
        distance = -target.x;
    }

    let opacity = if options.distance_opacity {
        (100.0 - distance / options.distance_opacity_factor) / 100.0
    } else {
        1.0
    };

    let angle = if options.rotate_icons {
        let center = Point::new(viewport.x / 2.0, viewport.y / 2.0);
        (center.y - screen.y).atan2(center.x - screen.x).to_degrees()
    } else {
        0.0
    };

    Some(Placement { screen, distance, angle, opacity })
}

/// Observable indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// No marker: not attached yet, no target, or target on screen.
    Hidden,
    /// One marker on the surface.
    Shown,
    /// Destroyed. No further transitions.
    Detached,
}

struct Inner {
    target: Option<Point>,
    options: EdgeIndicatorOptions,
    marker: Option<RotatableMarker>,
    subscriptions: Vec<Subscription>,
    state: IndicatorState,
}

impl Inner {
    fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    fn remove_marker(&mut self, surface: &mut dyn MapSurface) {
        if let Some(mut marker) = self.marker.take() {
            marker.remove(surface);
        }
    }

    fn recompute(&mut self, surface: &mut dyn MapSurface) {
        self.remove_marker(surface);
        self.state = IndicatorState::Hidden;

        let Some(target) = self.target else {
            return;
        };
        let target_screen = surface.world_to_screen(target);
        let Some(placement) = compute_placement(target_screen, surface.size(), &self.options) else {
            tracing::trace!(x = target_screen.x, y = target_screen.y, "edge indicator hidden: target on screen");
            return;
        };

        // Built fresh each time; the indicator's own options are never touched.
        let marker_options = MarkerOptions {
            angle: placement.angle,
            icon: self.options.icon.clone(),
            opacity: placement.opacity,
            clickable: self.options.clickable,
            reference: Some(target),
        };
        let position = surface.screen_to_world(placement.screen);
        let mut marker = RotatableMarker::new(position, marker_options);
        marker.add_to(surface);
        self.marker = Some(marker);
        self.state = IndicatorState::Shown;

        tracing::debug!(
            x = placement.screen.x,
            y = placement.screen.y,
            angle = placement.angle,
            opacity = placement.opacity,
            distance = placement.distance,
            "edge indicator shown"
        );
    }

    /// Target to centre on if `layer` is this indicator's marker.
    fn click_target(&self, layer: LayerId) -> Option<Point> {
        let marker = self.marker.as_ref()?;
        if marker.layer() == Some(layer) { self.target } else { None }
    }
}

/// Marker that tracks an off-screen target from the viewport edge.
///
/// Cloning yields another handle to the same indicator. Call
/// [`EdgeIndicator::destroy`] before dropping the last handle of an attached
/// indicator: dropping does not reach the surface, so the marker layer and
/// the surface subscriptions stay behind.
#[derive(Clone)]
pub struct EdgeIndicator {
    inner: Rc<RefCell<Inner>>,
}

impl EdgeIndicator {
    /// Create an indicator for `target`. `None` shows nothing until a target is set.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` fail [`EdgeIndicatorOptions::validate`].
    pub fn new(target: Option<Point>, options: EdgeIndicatorOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let inner = Inner {
            target,
            options,
            marker: None,
            subscriptions: Vec::new(),
            state: IndicatorState::Hidden,
        };
        Ok(Self { inner: Rc::new(RefCell::new(inner)) })
    }

    /// Subscribe to the surface's view changes and run the first recompute.
    ///
    /// No-op if already attached or destroyed.
    pub fn add_to(&self, surface: &mut dyn MapSurface) -> &Self {
        {
            let inner = self.inner.borrow();
            if inner.is_attached() || inner.state == IndicatorState::Detached {
                return self;
            }
        }

        let weak = Rc::downgrade(&self.inner);
        let on_view_change: MapListener = Rc::new(move |surface: &mut dyn MapSurface, _event: &MapEvent| {
            recompute_weak(&weak, surface);
        });
        let weak = Rc::downgrade(&self.inner);
        let on_click: MapListener = Rc::new(move |surface: &mut dyn MapSurface, event: &MapEvent| {
            center_on_click(&weak, surface, event);
        });

        let subscriptions = vec![
            surface.subscribe(MapEventKind::Move, Rc::clone(&on_view_change)),
            surface.subscribe(MapEventKind::ViewReset, on_view_change),
            surface.subscribe(MapEventKind::Click, on_click),
        ];

        let mut inner = self.inner.borrow_mut();
        inner.subscriptions = subscriptions;
        tracing::debug!(tracked = ?inner.target, "edge indicator attached");
        inner.recompute(surface);
        self
    }

    /// Unsubscribe, remove any marker and enter [`IndicatorState::Detached`].
    ///
    /// No-op if the indicator was never attached or is already destroyed.
    pub fn destroy(&self, surface: &mut dyn MapSurface) {
        let mut inner = self.inner.borrow_mut();
        if !inner.is_attached() {
            return;
        }
        for subscription in std::mem::take(&mut inner.subscriptions) {
            surface.unsubscribe(subscription);
        }
        inner.remove_marker(surface);
        inner.state = IndicatorState::Detached;
        tracing::debug!("edge indicator destroyed");
    }

    /// Replace the target and recompute immediately.
    pub fn set_target(&self, surface: &mut dyn MapSurface, target: Point) {
        self.replace_target(surface, Some(target));
    }

    /// Forget the target, hiding the marker.
    pub fn clear_target(&self, surface: &mut dyn MapSurface) {
        self.replace_target(surface, None);
    }

    /// Rerun placement against the surface's current view. No-op unless attached.
    pub fn recompute(&self, surface: &mut dyn MapSurface) {
        let mut inner = self.inner.borrow_mut();
        if inner.is_attached() {
            inner.recompute(surface);
        }
    }

    #[must_use]
    pub fn state(&self) -> IndicatorState {
        self.inner.borrow().state
    }

    #[must_use]
    pub fn target(&self) -> Option<Point> {
        self.inner.borrow().target
    }

    /// Snapshot of the current marker, if shown.
    #[must_use]
    pub fn marker(&self) -> Option<RotatableMarker> {
        self.inner.borrow().marker.clone()
    }

    #[must_use]
    pub fn options(&self) -> EdgeIndicatorOptions {
        self.inner.borrow().options.clone()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.borrow().is_attached()
    }

    fn replace_target(&self, surface: &mut dyn MapSurface, target: Option<Point>) {
        let mut inner = self.inner.borrow_mut();
        inner.target = target;
        if inner.is_attached() {
            inner.recompute(surface);
        }
    }
}

impl MapOverlay for EdgeIndicator {
    fn attach_to(&mut self, surface: &mut dyn MapSurface) {
        self.add_to(surface);
    }

    fn detach(&mut self, surface: &mut dyn MapSurface) {
        self.destroy(surface);
    }

    fn is_attached(&self) -> bool {
        EdgeIndicator::is_attached(self)
    }
}

fn recompute_weak(inner: &Weak<RefCell<Inner>>, surface: &mut dyn MapSurface) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    // A surface that re-enters dispatch from a layer mutation finds the
    // indicator mid-recompute; the outer pass already reflects the new view.
    let Ok(mut inner) = inner.try_borrow_mut() else {
        tracing::trace!("edge indicator recompute skipped: re-entrant notification");
        return;
    };
    if inner.is_attached() {
        inner.recompute(surface);
    }
}

fn center_on_click(inner: &Weak<RefCell<Inner>>, surface: &mut dyn MapSurface, event: &MapEvent) {
    let MapEvent::Click { layer } = *event else {
        return;
    };
    let Some(inner) = inner.upgrade() else {
        return;
    };
    // Borrow released before panning: the pan fires Move back into this indicator.
    let target = match inner.try_borrow() {
        Ok(inner) => inner.click_target(layer),
        Err(_) => None,
    };
    if let Some(target) = target {
        tracing::debug!(x = target.x, y = target.y, "edge indicator clicked, centring on target");
        surface.pan_to(target);
    }
}
