//! Planet configuration.
//!
//! [`PlanetConfig`] gathers every constant the hero planet is built from: camera
//! setup, sphere tessellation, sun placement, atmosphere colours, asset paths,
//! the scroll animation targets and the DOM selectors used on the web. The
//! [`Default`] implementation reproduces the landing page look; the `with_*`
//! methods adjust single values before mounting.

use anyhow::{Context as _, ensure};
use instant::Duration;

use crate::ticker::LagSmoothing;

/// A linear RGB colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) sRGB hex string into a linear colour.
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        ensure!(
            digits.len() == 6 && digits.is_ascii(),
            "expected a colour of the form #rrggbb, got {hex:?}"
        );
        let channel = |range: std::ops::Range<usize>| -> anyhow::Result<u8> {
            u8::from_str_radix(&digits[range], 16)
                .with_context(|| format!("invalid hex digits in colour {hex:?}"))
        };
        Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Convert 8-bit sRGB channels to a linear colour.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let linear = |c: u8| srgb_to_linear(c as f32 / 255.0);
        Self {
            r: linear(r),
            g: linear(g),
            b: linear(b),
        }
    }
}

impl From<Colour> for cgmath::Vector3<f32> {
    fn from(c: Colour) -> Self {
        cgmath::Vector3::new(c.r, c.g, c.b)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// Sun placement on the unit sphere around the planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Polar angle from +Y in radians.
    pub phi: f32,
    /// Azimuth around +Y in radians, measured from +Z.
    pub theta: f32,
}

impl SunPosition {
    pub fn direction(&self) -> cgmath::Vector3<f32> {
        let sin_phi = self.phi.sin();
        cgmath::Vector3::new(
            sin_phi * self.theta.sin(),
            self.phi.cos(),
            sin_phi * self.theta.cos(),
        )
    }
}

/// Where the Earth maps are loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePaths {
    /// Asset folder: a directory on native, a path under the page origin on
    /// the web.
    pub root: String,
    /// Map files, relative to `root`.
    pub day: String,
    pub night: String,
    pub specular_clouds: String,
}

impl Default for TexturePaths {
    fn default() -> Self {
        Self {
            root: "assets".to_string(),
            day: "earth/day.jpg".to_string(),
            night: "earth/night.jpg".to_string(),
            specular_clouds: "earth/specularClouds.jpg".to_string(),
        }
    }
}

/// Camera destinations of the scroll fly-out, one per layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyOut {
    /// Logical viewport width above which the desktop target is used.
    pub breakpoint: f32,
    pub desktop: cgmath::Point3<f32>,
    pub mobile: cgmath::Point3<f32>,
}

impl FlyOut {
    pub fn target_for(&self, viewport_width: f32) -> cgmath::Point3<f32> {
        if viewport_width > self.breakpoint {
            self.desktop
        } else {
            self.mobile
        }
    }
}

/// DOM hooks of the hosting page. Only consulted on the web.
#[derive(Debug, Clone, PartialEq)]
pub struct Selectors {
    pub canvas: String,
    pub trigger: String,
    pub overlay: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            canvas: "canvas.planet-3D".to_string(),
            trigger: ".hero_main".to_string(),
            overlay: ".hero_main .content".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetConfig {
    pub title: String,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub camera_start: cgmath::Point3<f32>,
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub atmosphere_scale: f32,
    pub atmosphere_opacity: f32,
    pub atmosphere_day: Colour,
    pub atmosphere_twilight: Colour,
    pub sun: SunPosition,
    /// Earth spin in radians per second of ticker time.
    pub rotation_speed: f32,
    pub textures: TexturePaths,
    pub fly_out: FlyOut,
    /// Seconds the playhead needs to catch up with the scroll position.
    pub scrub: f32,
    /// Length of each tween on the hero timeline, in timeline seconds.
    pub tween_duration: f32,
    pub lag_smoothing: Option<LagSmoothing>,
    pub selectors: Selectors,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            title: "planet-hero".to_string(),
            fov_y_degrees: 15.0,
            z_near: 0.1,
            z_far: 10_000.0,
            camera_start: cgmath::Point3::new(0.0, 2.15, 4.5),
            radius: 2.0,
            width_segments: 64,
            height_segments: 64,
            atmosphere_scale: 1.13,
            atmosphere_opacity: 1.0,
            atmosphere_day: Colour::from_rgb8(0x4a, 0x96, 0xe8),
            atmosphere_twilight: Colour::from_rgb8(0x19, 0x50, 0xe5),
            sun: SunPosition {
                phi: std::f32::consts::PI * 0.48,
                theta: -1.8,
            },
            rotation_speed: 0.2,
            textures: TexturePaths::default(),
            fly_out: FlyOut {
                breakpoint: 768.0,
                desktop: cgmath::Point3::new(0.0, 0.1, 19.0),
                mobile: cgmath::Point3::new(0.1, 0.1, 30.0),
            },
            scrub: 3.0,
            tween_duration: 2.0,
            lag_smoothing: None,
            selectors: Selectors::default(),
        }
    }
}

impl PlanetConfig {
    pub fn with_atmosphere_colours(mut self, day: &str, twilight: &str) -> anyhow::Result<Self> {
        self.atmosphere_day = Colour::from_hex(day)?;
        self.atmosphere_twilight = Colour::from_hex(twilight)?;
        Ok(self)
    }

    pub fn with_atmosphere_opacity(mut self, opacity: f32) -> Self {
        self.atmosphere_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_sun(mut self, phi: f32, theta: f32) -> Self {
        self.sun = SunPosition { phi, theta };
        self
    }

    pub fn with_scrub(mut self, seconds: f32) -> Self {
        self.scrub = seconds.max(0.0);
        self
    }

    pub fn with_lag_smoothing(mut self, threshold: Duration, adjusted: Duration) -> Self {
        self.lag_smoothing = Some(LagSmoothing {
            threshold,
            adjusted,
        });
        self
    }

    pub fn with_textures(mut self, textures: TexturePaths) -> Self {
        self.textures = textures;
        self
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
