#![allow(clippy::float_cmp)]

use super::*;
use crate::marker::Icon;
use crate::surface::PlaneMap;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

const VIEWPORT: Point = Point { x: 800.0, y: 600.0 };

fn defaults() -> EdgeIndicatorOptions {
    EdgeIndicatorOptions::default()
}

fn fading() -> EdgeIndicatorOptions {
    EdgeIndicatorOptions { distance_opacity: true, ..EdgeIndicatorOptions::default() }
}

/// An 800x600 map whose camera puts world `(400, 1000)` at the viewport centre,
/// so world `(1000, 1000)` projects to screen `(1000, 300)`.
fn offset_map() -> PlaneMap {
    let mut map = PlaneMap::new(800.0, 600.0);
    map.pan_to(pt(400.0, 1000.0));
    map
}

fn attached(map: &mut PlaneMap, target: Point, options: EdgeIndicatorOptions) -> EdgeIndicator {
    let indicator = EdgeIndicator::new(Some(target), options).unwrap();
    indicator.add_to(map);
    indicator
}

/// Screen position of the indicator's marker.
fn marker_screen(map: &PlaneMap, indicator: &EdgeIndicator) -> Point {
    map.world_to_screen(indicator.marker().unwrap().position())
}

// =============================================================
// compute_placement: containment
// =============================================================

#[test]
fn inside_points_are_hidden() {
    for target in [pt(400.0, 300.0), pt(1.0, 1.0), pt(799.0, 599.0), pt(0.5, 598.0)] {
        assert!(compute_placement(target, VIEWPORT, &defaults()).is_none(), "{target:?}");
    }
}

#[test]
fn points_on_the_bounds_are_hidden() {
    for target in [pt(0.0, 0.0), pt(800.0, 600.0), pt(800.0, 300.0), pt(400.0, 0.0)] {
        assert!(compute_placement(target, VIEWPORT, &defaults()).is_none(), "{target:?}");
    }
}

#[test]
fn nan_coordinates_are_past_no_edge() {
    for target in [pt(f64::NAN, 300.0), pt(400.0, f64::NAN), pt(f64::NAN, f64::NAN)] {
        assert!(compute_placement(target, VIEWPORT, &defaults()).is_none(), "{target:?}");
    }
}

#[test]
fn nan_target_keeps_indicator_hidden() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(f64::NAN, f64::NAN), defaults());
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);

    map.pan_by(10.0, 0.0);
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);
}

// =============================================================
// compute_placement: clamping
// =============================================================

#[test]
fn right_overshoot_clamps_x_keeps_y() {
    let p = compute_placement(pt(1000.0, 300.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.screen, pt(776.0, 300.0));
    assert_eq!(p.distance, 200.0);
}

#[test]
fn left_overshoot_clamps_to_half_width() {
    let p = compute_placement(pt(-50.0, 120.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.screen, pt(24.0, 120.0));
    assert_eq!(p.distance, 50.0);
}

#[test]
fn top_overshoot_clamps_to_half_height() {
    let p = compute_placement(pt(250.0, -10.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.screen, pt(250.0, 24.0));
    assert_eq!(p.distance, 10.0);
}

#[test]
fn bottom_overshoot_clamps_to_bound_minus_half_height() {
    let p = compute_placement(pt(250.0, 900.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.screen, pt(250.0, 576.0));
    assert_eq!(p.distance, 300.0);
}

#[test]
fn clamp_uses_icon_size_per_axis() {
    let options = EdgeIndicatorOptions { icon: Icon::new("wide.png", 60.0, 20.0).unwrap(), ..defaults() };
    let p = compute_placement(pt(-5.0, -5.0), VIEWPORT, &options).unwrap();
    assert_eq!(p.screen, pt(30.0, 10.0));
}

#[test]
fn corner_clamps_both_axes() {
    let p = compute_placement(pt(900.0, 700.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.screen, pt(776.0, 576.0));
}

#[test]
fn corner_distance_is_horizontal_overshoot() {
    // Vertical overshoot 500, horizontal 100: horizontal wins.
    let p = compute_placement(pt(900.0, -500.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.distance, 100.0);

    // Vertical overshoot 10, horizontal 300: still horizontal.
    let p = compute_placement(pt(-300.0, 610.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.distance, 300.0);
}

// =============================================================
// compute_placement: angle
// =============================================================

#[test]
fn right_edge_points_left() {
    let p = compute_placement(pt(1000.0, 300.0), VIEWPORT, &defaults()).unwrap();
    assert!(approx_eq(p.angle.abs(), 180.0), "angle {}", p.angle);
}

#[test]
fn left_edge_points_right() {
    let p = compute_placement(pt(-10.0, 300.0), VIEWPORT, &defaults()).unwrap();
    assert!(approx_eq(p.angle, 0.0));
}

#[test]
fn top_edge_points_down_and_bottom_edge_points_up() {
    let top = compute_placement(pt(400.0, -10.0), VIEWPORT, &defaults()).unwrap();
    assert!(approx_eq(top.angle, 90.0));
    let bottom = compute_placement(pt(400.0, 610.0), VIEWPORT, &defaults()).unwrap();
    assert!(approx_eq(bottom.angle, -90.0));
}

#[test]
fn angle_is_measured_from_clamped_position() {
    let p = compute_placement(pt(900.0, -100.0), VIEWPORT, &defaults()).unwrap();
    let expected = (300.0_f64 - 24.0).atan2(400.0 - 776.0).to_degrees();
    assert!(approx_eq(p.angle, expected));
}

#[test]
fn rotation_disabled_gives_zero_angle() {
    let options = EdgeIndicatorOptions { rotate_icons: false, ..defaults() };
    let p = compute_placement(pt(1000.0, 300.0), VIEWPORT, &options).unwrap();
    assert_eq!(p.angle, 0.0);
}

// =============================================================
// compute_placement: opacity
// =============================================================

#[test]
fn opacity_is_one_without_fading() {
    let p = compute_placement(pt(5000.0, 300.0), VIEWPORT, &defaults()).unwrap();
    assert_eq!(p.opacity, 1.0);
}

#[test]
fn opacity_fades_with_distance() {
    // distance 100, factor 4: (100 - 25) / 100
    let p = compute_placement(pt(900.0, 300.0), VIEWPORT, &fading()).unwrap();
    assert!(approx_eq(p.opacity, 0.75));
}

#[test]
fn opacity_is_not_clamped() {
    // distance 800, factor 4: (100 - 200) / 100
    let p = compute_placement(pt(1600.0, 300.0), VIEWPORT, &fading()).unwrap();
    assert!(approx_eq(p.opacity, -1.0));
}

#[test]
fn opacity_uses_configured_factor() {
    let options = EdgeIndicatorOptions { distance_opacity_factor: 2.0, ..fading() };
    let p = compute_placement(pt(400.0, -40.0), VIEWPORT, &options).unwrap();
    assert!(approx_eq(p.opacity, 0.8));
}

#[test]
fn corner_opacity_follows_horizontal_overshoot() {
    let p = compute_placement(pt(900.0, -400.0), VIEWPORT, &fading()).unwrap();
    assert!(approx_eq(p.opacity, 0.75));
}

// =============================================================
// EdgeIndicator: construction
// =============================================================

#[test]
fn new_rejects_invalid_icon() {
    let options = EdgeIndicatorOptions {
        icon: Icon { width: 0.0, ..Icon::default() },
        ..defaults()
    };
    assert!(matches!(
        EdgeIndicator::new(Some(pt(0.0, 0.0)), options),
        Err(ConfigError::NonPositiveIconSize { .. })
    ));
}

#[test]
fn new_indicator_is_hidden_and_detached_from_surfaces() {
    let indicator = EdgeIndicator::new(Some(pt(1.0, 2.0)), defaults()).unwrap();
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(indicator.target(), Some(pt(1.0, 2.0)));
    assert!(!indicator.is_attached());
    assert!(indicator.marker().is_none());
}

// =============================================================
// EdgeIndicator: attach and recompute
// =============================================================

#[test]
fn add_to_registers_listeners_and_shows_marker() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());

    assert!(indicator.is_attached());
    assert_eq!(map.listener_count(MapEventKind::Move), 1);
    assert_eq!(map.listener_count(MapEventKind::ViewReset), 1);
    assert_eq!(map.listener_count(MapEventKind::Click), 1);
    assert_eq!(indicator.state(), IndicatorState::Shown);
    assert_eq!(map.layer_count(), 1);
    assert!(point_approx_eq(marker_screen(&map, &indicator), pt(776.0, 300.0)));
    assert!(approx_eq(indicator.marker().unwrap().angle().abs(), 180.0));
}

#[test]
fn add_to_twice_does_not_duplicate_listeners() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    indicator.add_to(&mut map);
    assert_eq!(map.listener_count(MapEventKind::Move), 1);
    assert_eq!(map.layer_count(), 1);
}

#[test]
fn target_in_view_stays_hidden() {
    let mut map = PlaneMap::new(800.0, 600.0);
    let indicator = attached(&mut map, pt(400.0, 300.0), defaults());
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);
}

#[test]
fn missing_target_shows_nothing() {
    let mut map = PlaneMap::new(800.0, 600.0);
    let indicator = EdgeIndicator::new(None, defaults()).unwrap();
    indicator.add_to(&mut map);
    assert!(indicator.is_attached());
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);
}

#[test]
fn recompute_twice_keeps_single_identical_marker() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    let before = indicator.marker().unwrap();

    indicator.recompute(&mut map);
    indicator.recompute(&mut map);

    let after = indicator.marker().unwrap();
    assert_eq!(map.layer_count(), 1);
    assert_eq!(after.position(), before.position());
    assert_eq!(after.angle(), before.angle());
    assert_eq!(after.opacity(), before.opacity());
    assert!(map.layer(after.layer().unwrap()).is_some());
    assert!(map.layer(before.layer().unwrap()).is_none());
}

#[test]
fn recompute_before_attach_is_noop() {
    let mut map = offset_map();
    let indicator = EdgeIndicator::new(Some(pt(1000.0, 1000.0)), defaults()).unwrap();
    indicator.recompute(&mut map);
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);
}

#[test]
fn panning_target_into_view_hides_marker() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    map.pan_by(-300.0, 0.0);
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);
}

#[test]
fn panning_target_out_of_view_shows_marker() {
    let mut map = PlaneMap::new(800.0, 600.0);
    let indicator = attached(&mut map, pt(400.0, 300.0), defaults());
    map.pan_by(0.0, -400.0);
    assert_eq!(indicator.state(), IndicatorState::Shown);
    assert!(point_approx_eq(marker_screen(&map, &indicator), pt(400.0, 24.0)));
}

#[test]
fn zooming_out_brings_target_into_view() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    map.set_zoom(0.5);
    assert_eq!(indicator.state(), IndicatorState::Hidden);
}

#[test]
fn marker_carries_target_as_reference() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    let layer = indicator.marker().unwrap().layer().unwrap();
    assert_eq!(map.layer(layer).unwrap().reference, Some(pt(1000.0, 1000.0)));
}

#[test]
fn marker_uses_configured_icon_and_opacity() {
    let icon = Icon::new("custom.png", 32.0, 32.0).unwrap();
    let options = EdgeIndicatorOptions { icon: icon.clone(), ..fading() };
    let mut map = offset_map();
    // Projects to screen (900, 300): 100px past the right edge.
    let indicator = attached(&mut map, pt(900.0, 1000.0), options.clone());

    let marker = indicator.marker().unwrap();
    assert_eq!(marker.options().icon, icon);
    assert!(approx_eq(marker.opacity(), 0.75));
    assert!(point_approx_eq(marker_screen(&map, &indicator), pt(784.0, 300.0)));
    assert_eq!(indicator.options(), options);
}

#[test]
fn recompute_never_mutates_indicator_options() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), fading());
    map.pan_by(0.0, 10.0);
    indicator.set_target(&mut map, pt(5000.0, 1000.0));
    assert_eq!(indicator.options(), fading());
}

// =============================================================
// EdgeIndicator: set_target / clear_target
// =============================================================

#[test]
fn set_target_to_viewport_centre_hides() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    let centre = map.center();
    indicator.set_target(&mut map, centre);
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(indicator.target(), Some(centre));
    assert_eq!(map.layer_count(), 0);
}

#[test]
fn set_target_moves_marker_to_other_edge() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    // World x -200 projects to screen x -200: left edge.
    indicator.set_target(&mut map, pt(-200.0, 1000.0));
    assert_eq!(map.layer_count(), 1);
    assert!(point_approx_eq(marker_screen(&map, &indicator), pt(24.0, 300.0)));
    assert!(approx_eq(indicator.marker().unwrap().angle(), 0.0));
}

#[test]
fn set_target_before_attach_only_stores() {
    let mut map = offset_map();
    let indicator = EdgeIndicator::new(None, defaults()).unwrap();
    indicator.set_target(&mut map, pt(1000.0, 1000.0));
    assert_eq!(indicator.target(), Some(pt(1000.0, 1000.0)));
    assert_eq!(map.layer_count(), 0);

    indicator.add_to(&mut map);
    assert_eq!(indicator.state(), IndicatorState::Shown);
}

#[test]
fn clear_target_hides_marker() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    indicator.clear_target(&mut map);
    assert_eq!(indicator.target(), None);
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);
}

// =============================================================
// EdgeIndicator: destroy
// =============================================================

#[test]
fn destroy_unsubscribes_and_removes_marker() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    indicator.destroy(&mut map);

    assert_eq!(indicator.state(), IndicatorState::Detached);
    assert!(!indicator.is_attached());
    assert!(indicator.marker().is_none());
    assert_eq!(map.layer_count(), 0);
    assert_eq!(map.listener_count(MapEventKind::Move), 0);
    assert_eq!(map.listener_count(MapEventKind::ViewReset), 0);
    assert_eq!(map.listener_count(MapEventKind::Click), 0);
}

#[test]
fn destroy_before_attach_is_noop() {
    let mut map = offset_map();
    let indicator = EdgeIndicator::new(Some(pt(1000.0, 1000.0)), defaults()).unwrap();
    indicator.destroy(&mut map);
    assert_eq!(indicator.state(), IndicatorState::Hidden);
}

#[test]
fn destroy_twice_is_noop() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    indicator.destroy(&mut map);
    indicator.destroy(&mut map);
    assert_eq!(indicator.state(), IndicatorState::Detached);
}

#[test]
fn destroyed_indicator_ignores_further_changes() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    indicator.destroy(&mut map);

    indicator.set_target(&mut map, pt(-5000.0, 1000.0));
    map.pan_by(10.0, 0.0);
    indicator.add_to(&mut map);

    assert_eq!(indicator.state(), IndicatorState::Detached);
    assert_eq!(map.layer_count(), 0);
    assert_eq!(map.listener_count(MapEventKind::Move), 0);
}

#[test]
fn drop_without_destroy_strands_marker_and_subscriptions() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    let layer = indicator.marker().unwrap().layer().unwrap();
    drop(indicator);

    // Stale listeners no longer reach the indicator, so nothing is rebuilt or removed.
    map.pan_by(5.0, 0.0);
    assert!(map.layer(layer).is_some());
    assert_eq!(map.layer_count(), 1);
    assert_eq!(map.listener_count(MapEventKind::Move), 1);
    assert_eq!(map.listener_count(MapEventKind::ViewReset), 1);
    assert_eq!(map.listener_count(MapEventKind::Click), 1);
}

#[test]
fn overlay_trait_attaches_and_destroys() {
    let mut map = offset_map();
    let mut indicator = EdgeIndicator::new(Some(pt(1000.0, 1000.0)), defaults()).unwrap();
    let overlay: &mut dyn MapOverlay = &mut indicator;
    overlay.attach_to(&mut map);
    assert!(overlay.is_attached());
    overlay.detach(&mut map);
    assert!(!overlay.is_attached());
    assert_eq!(indicator.state(), IndicatorState::Detached);
}

// =============================================================
// EdgeIndicator: click to recentre
// =============================================================

#[test]
fn clicking_marker_centres_view_on_target() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());

    let layer = indicator.marker().unwrap().layer();
    assert_eq!(map.click(pt(776.0, 300.0)), layer);
    assert!(point_approx_eq(map.center(), pt(1000.0, 1000.0)));
    assert_eq!(indicator.state(), IndicatorState::Hidden);
    assert_eq!(map.layer_count(), 0);
}

#[test]
fn clicking_elsewhere_does_not_pan() {
    let mut map = offset_map();
    let indicator = attached(&mut map, pt(1000.0, 1000.0), defaults());
    assert_eq!(map.click(pt(100.0, 100.0)), None);
    assert!(point_approx_eq(map.center(), pt(400.0, 1000.0)));
    assert_eq!(indicator.state(), IndicatorState::Shown);
}

#[test]
fn non_clickable_marker_ignores_clicks() {
    let mut map = offset_map();
    let options = EdgeIndicatorOptions { clickable: false, ..defaults() };
    let indicator = attached(&mut map, pt(1000.0, 1000.0), options);
    assert_eq!(map.click(pt(776.0, 300.0)), None);
    assert_eq!(indicator.state(), IndicatorState::Shown);
}
