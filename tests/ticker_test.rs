use instant::Duration;
use planet_hero::ticker::{FrameScheduler, LagSmoothing, Ticker};

fn assert_time(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn should_follow_the_wall_clock_by_default() {
    let mut ticker = Ticker::default();
    assert_eq!(ticker.lag_smoothing(), None);

    let first = ticker.tick_at(Duration::from_millis(16));
    let second = ticker.tick_at(Duration::from_millis(5_016));

    assert_time(first.time, 0.016);
    assert_time(second.time, 5.016);
    assert_time(second.delta, 5.0);
    assert_eq!(first.frame, 1);
    assert_eq!(second.frame, 2);
}

#[test]
fn should_smooth_long_gaps_when_enabled() {
    let mut ticker = Ticker::new(Some(LagSmoothing {
        threshold: Duration::from_millis(500),
        adjusted: Duration::from_millis(33),
    }));

    ticker.tick_at(Duration::from_millis(100));
    let after_gap = ticker.tick_at(Duration::from_millis(2_100));
    let next = ticker.tick_at(Duration::from_millis(2_116));

    assert_time(after_gap.time, 0.133);
    assert_time(after_gap.delta, 0.033);
    assert_time(next.time, 0.149);
}

#[test]
fn should_keep_short_gaps_when_smoothing() {
    let mut ticker = Ticker::new(Some(LagSmoothing {
        threshold: Duration::from_millis(500),
        adjusted: Duration::from_millis(33),
    }));

    ticker.tick_at(Duration::from_millis(100));
    let tick = ticker.tick_at(Duration::from_millis(400));

    assert_time(tick.time, 0.4);
}

#[test]
fn should_never_run_backwards() {
    let mut ticker = Ticker::default();

    ticker.tick_at(Duration::from_secs(2));
    let tick = ticker.tick_at(Duration::from_secs(1));

    assert_time(tick.time, 2.0);
    assert_time(tick.delta, 0.0);
}

#[test]
fn should_advance_with_real_time() {
    let mut ticker = Ticker::default();

    let first = ticker.tick();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = ticker.tick();

    assert!(second.time > first.time);
    assert!(second.delta > 0.0);
    assert_eq!(second.frame, first.frame + 1);
}
