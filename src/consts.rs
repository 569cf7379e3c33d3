//! Shared constants: default indicator options and camera limits.

// ── Indicator defaults ──────────────────────────────────────────

/// Image shipped as the default edge arrow.
pub const DEFAULT_ICON_URL: &str = "edge-arrow-marker.png";

/// Width and height of the default edge arrow, in pixels.
pub const DEFAULT_ICON_SIZE_PX: f64 = 48.0;

/// Overshoot pixels per percent of opacity lost when fading by distance.
pub const DEFAULT_DISTANCE_OPACITY_FACTOR: f64 = 4.0;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest zoom factor the reference surface accepts.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the reference surface accepts.
pub const MAX_ZOOM: f64 = 10.0;
