//! Scroll-scrubbed animation timeline.
//!
//! A [`Timeline`] lays tweens out in time and keeps named labels; tweens placed
//! at the same label run concurrently. [`HeroTimeline`] is the one timeline of
//! the hero section: the overlay fades out while the camera flies away from the
//! planet, both sampled from a single playhead in `0..=1`.

use std::collections::HashMap;

use cgmath::{EuclideanSpace, Point3};

use crate::{config::PlanetConfig, overlay::OverlayStyle};

/// Label both hero tweens start at.
pub const SETTING: &str = "setting";

/// Easing curves, named like their CSS-animation counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Quadratic.
    Power1In,
    Power1Out,
    Power1InOut,
    /// Quartic ease-out, used for scroll catch-up.
    Power3Out,
}

impl Ease {
    /// Map linear progress `t` in `0..=1` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
        }
    }
}

/// Values a tween can animate.
pub trait Interpolate: Copy {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        *self + (*to - *self) * t
    }
}

impl Interpolate for Point3<f32> {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        let from = self.to_vec();
        Point3::from_vec(from + (to.to_vec() - from) * t)
    }
}

impl Interpolate for OverlayStyle {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        OverlayStyle {
            opacity: self.opacity.lerp(&to.opacity, t),
            blur_px: self.blur_px.lerp(&to.blur_px, t),
            scale: self.scale.lerp(&to.scale, t),
        }
    }
}

/// A single `from -> to` animation placed on a timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl<T: Interpolate> Tween<T> {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Value at timeline time `time`. Before the start the tween holds `from`,
    /// after its end it holds `to`.
    pub fn value_at(&self, time: f32) -> T {
        let t = if self.duration <= 0.0 {
            if time >= self.start { 1.0 } else { 0.0 }
        } else {
            (time - self.start) / self.duration
        };
        self.from.lerp(&self.to, self.ease.apply(t))
    }
}

/// Time layout of a timeline: labels and the running end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    labels: HashMap<String, f32>,
    duration: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start time of `label`. Unknown labels are created at the current end.
    pub fn position(&mut self, label: &str) -> f32 {
        let end = self.duration;
        *self.labels.entry(label.to_string()).or_insert(end)
    }

    pub fn label(&self, label: &str) -> Option<f32> {
        self.labels.get(label).copied()
    }

    /// Place a tween at `label` and extend the timeline to cover it.
    pub fn add<T: Interpolate>(
        &mut self,
        label: &str,
        from: T,
        to: T,
        duration: f32,
        ease: Ease,
    ) -> Tween<T> {
        let tween = Tween {
            from,
            to,
            start: self.position(label),
            duration: duration.max(0.0),
            ease,
        };
        self.duration = self.duration.max(tween.end());
        tween
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Timeline time of a playhead in `0..=1`.
    pub fn time_at(&self, progress: f32) -> f32 {
        progress.clamp(0.0, 1.0) * self.duration
    }
}

/// Animated state at one playhead position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSample {
    pub overlay: OverlayStyle,
    pub camera: Point3<f32>,
}

/// Overlay fade-out and camera fly-out, both starting at [`SETTING`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeroTimeline {
    timeline: Timeline,
    overlay: Tween<OverlayStyle>,
    camera: Tween<Point3<f32>>,
}

impl HeroTimeline {
    /// The fly-out target is picked from `viewport_width` here and never
    /// re-evaluated, even if the window later crosses the breakpoint.
    pub fn new(config: &PlanetConfig, camera_start: Point3<f32>, viewport_width: f32) -> Self {
        let mut timeline = Timeline::new();
        let overlay = timeline.add(
            SETTING,
            OverlayStyle::VISIBLE,
            OverlayStyle::HIDDEN,
            config.tween_duration,
            Ease::Power1InOut,
        );
        let target = config.fly_out.target_for(viewport_width);
        let camera = timeline.add(
            SETTING,
            camera_start,
            target,
            config.tween_duration,
            Ease::Power1InOut,
        );
        log::debug!(
            "hero timeline: {}s, camera {:?} -> {:?}",
            timeline.duration(),
            camera_start,
            target
        );
        Self {
            timeline,
            overlay,
            camera,
        }
    }

    pub fn sample(&self, progress: f32) -> TimelineSample {
        let time = self.timeline.time_at(progress);
        TimelineSample {
            overlay: self.overlay.value_at(time),
            camera: self.camera.value_at(time),
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn camera_target(&self) -> Point3<f32> {
        self.camera.to
    }
}
