use cgmath::Point3;
use planet_hero::{PlanetConfig, Viewport, overlay::OverlayStyle};

use crate::common::test_utils::{Harness, assert_close, assert_point_close, desktop, mobile};

mod common;

#[test]
fn should_start_at_the_configured_camera() {
    let config = PlanetConfig::default();
    let harness = Harness::mount(&config, desktop());

    assert_point_close(harness.planet.camera_position(), Point3::new(0.0, 2.15, 4.5));
    assert_eq!(harness.planet.progress(), 0.0);
    assert_eq!(harness.renders(), 0);
}

#[test]
fn should_render_exactly_once_per_frame() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    for i in 1..=5 {
        harness.frame_at(i as f64 * 0.016);
    }

    assert_eq!(harness.renders(), 5);
}

#[test]
fn should_spin_with_ticker_time() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    harness.frame_at(1.0);
    assert_close(harness.planet.earth_rotation(), 0.2);
    harness.frame_at(10.0);
    assert_close(harness.planet.earth_rotation(), 2.0);
}

#[test]
fn should_spin_independently_of_frame_spacing() {
    let config = PlanetConfig::default();
    let mut smooth = Harness::mount(&config, desktop());
    let mut choppy = Harness::mount(&config, desktop());

    for i in 0..=60 {
        smooth.frame_at(1.0 + i as f64 / 60.0);
    }
    choppy.frame_at(1.0);
    choppy.frame_at(1.5);
    choppy.frame_at(2.0);

    let smooth_rotations = smooth.log.borrow().rotations.clone();
    let choppy_rotations = choppy.log.borrow().rotations.clone();
    let smooth_turn = smooth_rotations[60] - smooth_rotations[0];
    let choppy_turn = choppy_rotations[2] - choppy_rotations[0];
    assert_close(smooth_turn, 0.2);
    assert_close(choppy_turn, 0.2);
}

#[test]
fn should_apply_the_initial_overlay_once() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    harness.frame_at(0.1);
    harness.frame_at(0.2);
    harness.frame_at(0.3);

    assert_eq!(*harness.overlay.borrow(), vec![OverlayStyle::VISIBLE]);
}

#[test]
fn should_fly_out_to_the_desktop_target() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    harness.scroll_and_settle(1.0);

    assert_close(harness.planet.progress(), 1.0);
    assert_point_close(harness.planet.camera_position(), Point3::new(0.0, 0.1, 19.0));
    let last = *harness.overlay.borrow().last().expect("overlay was styled");
    assert_eq!(last, OverlayStyle::HIDDEN);
    assert!(!last.visible());
}

#[test]
fn should_fly_out_to_the_mobile_target() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, mobile());

    harness.scroll_and_settle(1.0);

    assert_point_close(harness.planet.camera_position(), Point3::new(0.1, 0.1, 30.0));
}

#[test]
fn should_treat_the_breakpoint_width_as_mobile() {
    let config = PlanetConfig::default();
    let viewport = Viewport::new(768.0, 1024.0, 2.0).unwrap();
    let harness = Harness::mount(&config, viewport);

    assert_point_close(
        harness.planet.timeline().camera_target(),
        Point3::new(0.1, 0.1, 30.0),
    );
}

#[test]
fn should_keep_the_breakpoint_decision_after_resize() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    harness.planet.resize(mobile());
    harness.scroll_and_settle(1.0);

    assert_point_close(harness.planet.camera_position(), Point3::new(0.0, 0.1, 19.0));
}

#[test]
fn should_mount_mid_scroll_without_catch_up() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount_scrolled(&config, desktop(), 1.0);

    harness.frame_at(0.016);

    assert_close(harness.planet.progress(), 1.0);
    assert_point_close(harness.planet.camera_position(), Point3::new(0.0, 0.1, 19.0));
}

#[test]
fn should_lag_behind_the_scroll_position() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    harness.scroll.set(1.0);
    harness.frame_at(0.5);
    let early = harness.planet.progress();
    harness.frame_at(1.5);
    let later = harness.planet.progress();

    assert!(early > 0.0 && early < 1.0, "progress {early}");
    assert!(later > early && later < 1.0, "progress {later}");
}

#[test]
fn should_resize_without_touching_progress() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());
    harness.scroll.set(0.5);
    harness.frame_at(1.0);
    let progress = harness.planet.progress();

    let viewport = Viewport::new(800.0, 400.0, 2.0).unwrap();
    harness.planet.resize(viewport);

    assert_eq!(harness.planet.progress(), progress);
    assert_close(harness.planet.scene().camera.aspect(), 2.0);
    let log = harness.log.borrow();
    let size = log.resizes.last().expect("renderer was resized");
    assert_eq!((size.width, size.height), (1600, 800));
}

#[test]
fn should_not_render_after_dispose() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());
    harness.frame_at(0.1);
    let overlay_calls = harness.overlay.borrow().len();

    harness.planet.dispose();
    harness.scroll.set(1.0);
    harness.frame_at(0.2);
    harness.frame_at(5.0);

    assert!(harness.planet.is_disposed());
    assert_eq!(harness.renders(), 1);
    assert_eq!(harness.overlay.borrow().len(), overlay_calls);
    assert_eq!(harness.log.borrow().disposals, 1);
}

#[test]
fn should_dispose_only_once() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());
    let removals = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = removals.clone();
    harness
        .planet
        .on_dispose(move || counter.set(counter.get() + 1));

    harness.planet.dispose();
    harness.planet.dispose();

    assert_eq!(removals.get(), 1);
    assert_eq!(harness.log.borrow().disposals, 1);
    assert_eq!(harness.log.borrow().scroll_disposals, 1);
}

#[test]
fn should_finish_teardown_when_signalled_from_outside() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());
    harness.frame_at(0.1);

    harness.signal.dispose();
    harness.frame_at(0.2);

    assert_eq!(harness.renders(), 1);
    assert_eq!(harness.log.borrow().disposals, 1);
    assert_eq!(harness.log.borrow().scroll_disposals, 1);
}

#[test]
fn should_ignore_resizes_after_dispose() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    harness.planet.dispose();
    harness.planet.resize(mobile());

    assert!(harness.log.borrow().resizes.is_empty());
}

#[test]
fn should_remeasure_the_scroll_trigger_on_resize() {
    let config = PlanetConfig::default();
    let mut harness = Harness::mount(&config, desktop());

    harness.planet.resize(mobile());
    harness.planet.dispose();
    harness.planet.resize(desktop());

    assert_eq!(harness.log.borrow().scroll_refreshes, vec![390.0]);
}
