//! Viewport size in logical pixels plus the device pixel ratio.

use anyhow::ensure;
use winit::dpi::PhysicalSize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    pixel_ratio: f32,
}

/// Size of the renderer's backing store in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> anyhow::Result<Self> {
        ensure!(
            width.is_finite() && width > 0.0,
            "viewport width must be positive, got {width}"
        );
        ensure!(
            height.is_finite() && height > 0.0,
            "viewport height must be positive, got {height}"
        );
        ensure!(
            pixel_ratio.is_finite() && pixel_ratio > 0.0,
            "device pixel ratio must be positive, got {pixel_ratio}"
        );
        Ok(Self {
            width,
            height,
            pixel_ratio,
        })
    }

    /// Viewport of a window whose inner size winit reports in physical pixels.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> anyhow::Result<Self> {
        let ratio = scale_factor as f32;
        Self::new(size.width as f32 / ratio, size.height as f32 / ratio, ratio)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn surface_size(&self) -> SurfaceSize {
        // the epsilon absorbs rounding from a physical -> logical -> physical trip
        let physical = |logical: f32| ((logical * self.pixel_ratio + 1e-3).floor() as u32).max(1);
        SurfaceSize {
            width: physical(self.width),
            height: physical(self.height),
        }
    }
}
