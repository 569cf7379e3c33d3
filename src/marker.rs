//! Rotatable point marker: a positioned icon with an orientation angle.
//!
//! [`RotatableMarker`] is a generic primitive. It knows nothing about edges
//! or targets; it places an [`Icon`] at a world position on a
//! [`MapSurface`] and asks the surface to rotate the element about its own
//! centre through the surface's [`MapSurface::apply_rotation`] capability.

#[cfg(test)]
#[path = "marker_test.rs"]
mod marker_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::config::{ConfigError, is_positive_finite};
use crate::consts::{DEFAULT_ICON_SIZE_PX, DEFAULT_ICON_URL};
use crate::surface::{LayerId, MapOverlay, MapSurface, MarkerElement};

/// Icon image and pixel geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    /// Image reference handed to the host surface.
    pub url: String,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Pixel offset of the point that sits on the marker position.
    /// Centre of the icon when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Point>,
}

impl Default for Icon {
    fn default() -> Self {
        Self {
            url: DEFAULT_ICON_URL.to_owned(),
            width: DEFAULT_ICON_SIZE_PX,
            height: DEFAULT_ICON_SIZE_PX,
            anchor: None,
        }
    }
}

impl Icon {
    /// Build an icon anchored at its centre.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveIconSize`] unless both dimensions are positive.
    pub fn new(url: impl Into<String>, width: f64, height: f64) -> Result<Self, ConfigError> {
        let icon = Self { url: url.into(), width, height, anchor: None };
        icon.validate()?;
        Ok(icon)
    }

    /// Check that both dimensions are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveIconSize`] on a zero, negative, infinite or NaN dimension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_positive_finite(self.width) && is_positive_finite(self.height) {
            Ok(())
        } else {
            Err(ConfigError::NonPositiveIconSize { width: self.width, height: self.height })
        }
    }

    /// Anchor offset, defaulting to the icon centre.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor.unwrap_or_else(|| self.half_size())
    }

    /// Half the icon size on each axis.
    #[must_use]
    pub fn half_size(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Rotation transform applied about an element's own centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Clockwise on screen, in degrees. 0 points right.
    pub angle_deg: f64,
}

impl Rotation {
    /// Transform origin keeping the rotation centred on the element.
    pub const ORIGIN: &'static str = "50% 50%";

    #[must_use]
    pub fn new(angle_deg: f64) -> Self {
        Self { angle_deg }
    }

    /// CSS transform fragment, e.g. `rotate(90deg)`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("rotate({}deg)", self.angle_deg)
    }

    /// Row-major 2x2 matrix `[m11, m12, m21, m22]` for hosts without CSS transforms.
    #[must_use]
    pub fn matrix(&self) -> [f64; 4] {
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        [cos, -sin, sin, cos]
    }
}

/// Display options for a [`RotatableMarker`].
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    /// Orientation in degrees.
    pub angle: f64,
    pub icon: Icon,
    /// Visual alpha. Not clamped.
    pub opacity: f64,
    pub clickable: bool,
    /// World point the marker stands for, if it stands in for another one.
    pub reference: Option<Point>,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self { angle: 0.0, icon: Icon::default(), opacity: 1.0, clickable: true, reference: None }
    }
}

/// A point marker with an orientation angle.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatableMarker {
    position: Point,
    options: MarkerOptions,
    layer: Option<LayerId>,
}

impl RotatableMarker {
    /// Create a marker at a world position. It is not visible until added to a surface.
    #[must_use]
    pub fn new(position: Point, options: MarkerOptions) -> Self {
        Self { position, options, layer: None }
    }

    /// Insert the marker into the surface's layer set and apply its rotation.
    ///
    /// A marker that is already on a surface is removed from it first.
    pub fn add_to(&mut self, surface: &mut dyn MapSurface) -> &mut Self {
        self.remove(surface);
        let element = MarkerElement {
            position: self.position,
            icon: self.options.icon.clone(),
            opacity: self.options.opacity,
            clickable: self.options.clickable,
            reference: self.options.reference,
            rotation: None,
        };
        let layer = surface.add_layer(element);
        surface.apply_rotation(layer, Rotation::new(self.options.angle));
        self.layer = Some(layer);
        self
    }

    /// Store a new angle. It becomes visible on the next reposition.
    pub fn set_angle(&mut self, angle: f64) {
        self.options.angle = angle;
    }

    /// Move the marker, reapplying the rotation if it is on a surface.
    pub fn set_position(&mut self, surface: &mut dyn MapSurface, position: Point) {
        self.position = position;
        if let Some(layer) = self.layer {
            surface.set_layer_position(layer, position);
            surface.apply_rotation(layer, Rotation::new(self.options.angle));
        }
    }

    /// Take the marker off the surface. No-op if it is not attached.
    pub fn remove(&mut self, surface: &mut dyn MapSurface) {
        if let Some(layer) = self.layer.take() {
            surface.remove_layer(layer);
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.options.angle
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.options.opacity
    }

    #[must_use]
    pub fn options(&self) -> &MarkerOptions {
        &self.options
    }

    /// Layer handle while the marker is on a surface.
    #[must_use]
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }
}

impl MapOverlay for RotatableMarker {
    fn attach_to(&mut self, surface: &mut dyn MapSurface) {
        self.add_to(surface);
    }

    fn detach(&mut self, surface: &mut dyn MapSurface) {
        self.remove(surface);
    }

    fn is_attached(&self) -> bool {
        self.layer.is_some()
    }
}
