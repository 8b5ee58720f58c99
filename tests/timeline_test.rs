use cgmath::Point3;
use planet_hero::{
    PlanetConfig,
    overlay::OverlayStyle,
    scroll::{ScrollObserver, ScrollRange, Scrub, WheelScroll},
    timeline::{Ease, HeroTimeline, SETTING, Timeline},
};

use crate::common::test_utils::{assert_close, assert_point_close, desktop};

mod common;

#[test]
fn eases_should_hit_both_ends() {
    for ease in [
        Ease::Linear,
        Ease::Power1In,
        Ease::Power1Out,
        Ease::Power1InOut,
        Ease::Power3Out,
    ] {
        assert_close(ease.apply(0.0), 0.0);
        assert_close(ease.apply(1.0), 1.0);
    }
}

#[test]
fn eases_should_shape_the_middle() {
    assert_close(Ease::Power1InOut.apply(0.5), 0.5);
    assert_close(Ease::Power1InOut.apply(0.25), 0.125);
    assert_close(Ease::Power1In.apply(0.5), 0.25);
    assert_close(Ease::Power3Out.apply(0.5), 0.9375);
    assert_close(Ease::Linear.apply(2.0), 1.0);
}

#[test]
fn should_create_missing_labels_at_the_end() {
    let mut timeline = Timeline::new();
    assert_eq!(timeline.position("intro"), 0.0);

    let tween = timeline.add("intro", 0.0_f32, 1.0, 2.0, Ease::Linear);
    assert_eq!(tween.start, 0.0);
    assert_eq!(timeline.duration(), 2.0);

    assert_eq!(timeline.position("outro"), 2.0);
    assert_eq!(timeline.label("intro"), Some(0.0));
    assert_eq!(timeline.label("missing"), None);
}

#[test]
fn should_run_tweens_at_the_same_label_concurrently() {
    let mut timeline = Timeline::new();
    let a = timeline.add("shared", 0.0_f32, 1.0, 2.0, Ease::Linear);
    let b = timeline.add("shared", 10.0_f32, 20.0, 1.0, Ease::Linear);

    assert_eq!(a.start, b.start);
    assert_eq!(timeline.duration(), 2.0);
    assert_close(a.value_at(1.0), 0.5);
    assert_close(b.value_at(1.0), 20.0);
    assert_close(b.value_at(-1.0), 10.0);
}

#[test]
fn hero_timeline_should_start_at_the_initial_state() {
    let config = PlanetConfig::default();
    let timeline = HeroTimeline::new(&config, config.camera_start, 1280.0);

    let sample = timeline.sample(0.0);

    assert_eq!(sample.overlay, OverlayStyle::VISIBLE);
    assert!(sample.overlay.visible());
    assert_point_close(sample.camera, config.camera_start);
    assert_eq!(timeline.timeline().label(SETTING), Some(0.0));
    assert_eq!(timeline.timeline().duration(), 2.0);
}

#[test]
fn hero_timeline_should_end_at_the_terminal_state() {
    let config = PlanetConfig::default();
    let timeline = HeroTimeline::new(&config, config.camera_start, 1280.0);

    let sample = timeline.sample(1.0);

    assert_eq!(sample.overlay, OverlayStyle::HIDDEN);
    assert!(!sample.overlay.visible());
    assert_point_close(sample.camera, Point3::new(0.0, 0.1, 19.0));
}

#[test]
fn hero_timeline_should_blend_halfway() {
    let config = PlanetConfig::default();
    let timeline = HeroTimeline::new(&config, config.camera_start, 1280.0);

    let sample = timeline.sample(0.5);

    assert_close(sample.overlay.opacity, 0.5);
    assert_close(sample.overlay.blur_px, 20.0);
    assert_close(sample.overlay.scale, 0.75);
    assert_point_close(sample.camera, Point3::new(0.0, 1.125, 11.75));
}

#[test]
fn hero_timeline_should_pick_the_target_by_width() {
    let config = PlanetConfig::default();

    let wide = HeroTimeline::new(&config, config.camera_start, 769.0);
    let narrow = HeroTimeline::new(&config, config.camera_start, 768.0);

    assert_point_close(wide.camera_target(), Point3::new(0.0, 0.1, 19.0));
    assert_point_close(narrow.camera_target(), Point3::new(0.1, 0.1, 30.0));
}

#[test]
fn scroll_range_should_clamp_progress() {
    let range = ScrollRange {
        start: 100.0,
        end: 300.0,
    };

    assert_eq!(range.progress(0.0), 0.0);
    assert_eq!(range.progress(100.0), 0.0);
    assert_close(range.progress(150.0), 0.25);
    assert_eq!(range.progress(300.0), 1.0);
    assert_eq!(range.progress(1000.0), 1.0);
}

#[test]
fn empty_scroll_range_should_jump() {
    let range = ScrollRange {
        start: 50.0,
        end: 50.0,
    };

    assert_eq!(range.progress(49.0), 0.0);
    assert_eq!(range.progress(50.0), 1.0);
}

#[test]
fn scrub_should_ease_towards_the_target() {
    let mut scrub = Scrub::new(3.0, 0.0);

    assert_eq!(scrub.update(1.0, 0.0), 0.0);
    assert_close(scrub.update(1.0, 1.5), 0.9375);
    assert!(!scrub.is_settled());
    assert_eq!(scrub.update(1.0, 1.5), 1.0);
    assert!(scrub.is_settled());
}

#[test]
fn scrub_should_restart_from_the_current_value() {
    let mut scrub = Scrub::new(3.0, 0.0);
    let halfway = scrub.update(1.0, 1.5);

    // reversing mid catch-up starts a new catch-up from where the playhead is
    assert_close(scrub.update(0.0, 0.0), halfway);
    assert_eq!(scrub.target(), 0.0);
    assert_eq!(scrub.update(0.0, 3.0), 0.0);
}

#[test]
fn scrub_without_lag_should_follow_immediately() {
    let mut scrub = Scrub::new(0.0, 0.0);

    assert_eq!(scrub.update(0.7, 0.0), 0.7);
    assert_eq!(scrub.current(), 0.7);
}

#[test]
fn wheel_scroll_should_cover_one_viewport_height() {
    let mut scroll = WheelScroll::new(&desktop());

    scroll.scroll_by(360.0);
    assert_close(scroll.progress(), 0.5);
    scroll.scroll_by(10_000.0);
    assert_eq!(scroll.progress(), 1.0);
    scroll.scroll_by(-10_000.0);
    assert_eq!(scroll.progress(), 0.0);
}
