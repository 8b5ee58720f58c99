//! planet-hero
//!
//! A decorative, scroll-reactive Earth for a landing page hero section. The
//! planet spins at a constant rate, blends day and night maps along the
//! terminator, glows with a Fresnel atmosphere and flies away from the camera
//! as the page scrolls. It runs in a native window and, through wasm, on a
//! `<canvas>` of a web page.
//!
//! High-level modules
//! - `camera`: perspective camera and its uniform
//! - `config`: every constant the planet is built from
//! - `context`: GPU device, queue and render surface
//! - `data_structures`: transforms, sphere meshes, scene graph, textures
//! - `flow`: the winit event loop hosting the planet
//! - `overlay`: styling of the hero text above the planet
//! - `pipelines`: the Earth and atmosphere render pipelines
//! - `planet`: mount / frame / resize / dispose of the hero planet
//! - `render`: the renderer seam and its wgpu implementation
//! - `resources`: asynchronous asset loading
//! - `scene`: camera plus planet group
//! - `scroll`: scroll progress and scrubbing
//! - `shading`: CPU reference of the per-pixel shading
//! - `ticker`: frame scheduling
//! - `timeline`: tweens, labels and the hero timeline
//! - `viewport`: logical size and pixel ratio
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod overlay;
pub mod pipelines;
pub mod planet;
pub mod render;
pub mod resources;
pub mod scene;
pub mod scroll;
pub mod shading;
pub mod ticker;
pub mod timeline;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-exports commonly used types for convenience in downstream code.
pub use config::PlanetConfig;
pub use planet::{DisposeSignal, HeroPlanet, PageHooks};
pub use render::{PlanetRenderer, Renderer};
pub use scene::PlanetScene;
pub use viewport::Viewport;
pub use winit::event::WindowEvent;
