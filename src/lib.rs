//! Edge indicator for pannable/zoomable maps.
//!
//! When a tracked target lies outside the visible viewport, an
//! [`EdgeIndicator`](indicator::EdgeIndicator) places a single marker on the
//! nearest viewport edge, turned to point toward the target and optionally
//! faded by distance. When the target is back on screen the marker goes away.
//! The indicator recomputes synchronously inside the host surface's own event
//! dispatch; there are no threads and nothing async.
//!
//! The host map is abstracted as [`surface::MapSurface`]. [`surface::PlaneMap`]
//! is a ready-made implementation over a flat world with a pan/zoom camera.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`indicator`] | Edge indicator controller and the pure placement geometry |
//! | [`marker`] | Rotatable point marker, icon geometry, rotation transform |
//! | [`bind`] | Binding an indicator to a movable map object |
//! | [`surface`] | Host surface contract and the `PlaneMap` reference surface |
//! | [`events`] | Event kinds, subscription handles, listener registry |
//! | [`camera`] | Points and the pan/zoom camera |
//! | [`config`] | Indicator options, defaults and validation |
//! | [`consts`] | Shared defaults and limits |

pub mod bind;
pub mod camera;
pub mod config;
pub mod consts;
pub mod events;
pub mod indicator;
pub mod marker;
pub mod surface;
