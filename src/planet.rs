//! The mounted hero planet and its per-frame loop.
//!
//! [`HeroPlanet`] ties the scene to its renderer, the frame scheduler, the
//! scroll observer and the overlay. Its lifecycle has two states: running
//! after [`HeroPlanet::mount`], and disposed after [`HeroPlanet::dispose`] (or
//! once its [`DisposeSignal`] fires). Nothing is drawn or styled once disposed.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use cgmath::Point3;
use winit::event::WindowEvent;

use crate::{
    config::PlanetConfig,
    overlay::{OverlaySink, OverlayStyle},
    render::Renderer,
    scene::PlanetScene,
    scroll::{ScrollObserver, Scrub},
    ticker::FrameScheduler,
    timeline::HeroTimeline,
    viewport::Viewport,
};

/// Shared "disposed" flag. Hosts keep a clone to stop the planet from outside
/// the event loop; the next frame notices and finishes the teardown.
#[derive(Debug, Clone, Default)]
pub struct DisposeSignal(Arc<AtomicBool>);

impl DisposeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_disposed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Page-facing collaborators of the planet.
pub struct PageHooks {
    pub scheduler: Box<dyn FrameScheduler>,
    pub scroll: Box<dyn ScrollObserver>,
    pub overlay: Box<dyn OverlaySink>,
}

pub struct HeroPlanet<R: Renderer> {
    scene: PlanetScene,
    renderer: R,
    scheduler: Box<dyn FrameScheduler>,
    scroll: Box<dyn ScrollObserver>,
    overlay: Box<dyn OverlaySink>,
    scrub: Scrub,
    timeline: HeroTimeline,
    last_overlay: Option<OverlayStyle>,
    viewport: Viewport,
    rotation_speed: f32,
    disposed: DisposeSignal,
    teardown: Vec<Box<dyn FnOnce()>>,
}

impl<R: Renderer> HeroPlanet<R> {
    /// Register the scroll timeline and start from the current scroll position.
    ///
    /// The fly-out target is chosen here from the viewport width.
    pub fn mount(
        config: &PlanetConfig,
        mut scene: PlanetScene,
        viewport: Viewport,
        renderer: R,
        hooks: PageHooks,
        disposed: DisposeSignal,
    ) -> Self {
        let PageHooks {
            scheduler,
            mut scroll,
            overlay,
        } = hooks;
        let timeline = HeroTimeline::new(config, scene.camera.position, viewport.width());
        let progress = scroll.progress();
        scene.set_camera_position(timeline.sample(progress).camera);
        log::info!(
            "hero planet mounted at {}x{} (x{}), scroll progress {:.3}",
            viewport.width(),
            viewport.height(),
            viewport.pixel_ratio(),
            progress
        );

        Self {
            scene,
            renderer,
            scheduler,
            scroll,
            overlay,
            scrub: Scrub::new(config.scrub, progress),
            timeline,
            last_overlay: None,
            viewport,
            rotation_speed: config.rotation_speed,
            disposed,
            teardown: Vec::new(),
        }
    }

    /// Run `f` on dispose. Used to pair global listener registrations with
    /// their removal.
    pub fn on_dispose(&mut self, f: impl FnOnce() + 'static) {
        if self.is_disposed() {
            f();
        } else {
            self.teardown.push(Box::new(f));
        }
    }

    /// Advance animations to the scheduler's time and draw exactly once.
    pub fn frame(&mut self) -> anyhow::Result<()> {
        if self.disposed.is_disposed() {
            if !self.renderer.is_disposed() {
                self.dispose();
            }
            return Ok(());
        }

        let tick = self.scheduler.tick();
        let target = self.scroll.progress();
        let playhead = self.scrub.update(target, tick.delta as f32);
        let sample = self.timeline.sample(playhead);

        self.scene.set_camera_position(sample.camera);
        if self.last_overlay != Some(sample.overlay) {
            self.overlay.apply(&sample.overlay);
            self.last_overlay = Some(sample.overlay);
        }
        self.scene
            .set_earth_rotation((tick.time * self.rotation_speed as f64) as f32);
        log::trace!(
            "frame {} t={:.3} progress {:.3} -> {:.3}",
            tick.frame,
            tick.time,
            target,
            playhead
        );

        self.renderer.render(&self.scene)
    }

    /// Follow a viewport change. Scroll progress and the fly-out target are
    /// left alone.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.is_disposed() {
            return;
        }
        self.viewport = viewport;
        self.scene.set_aspect(viewport.aspect());
        self.scroll.resize(&viewport);
        self.renderer.resize(viewport.surface_size());
        log::debug!("resized to {:?}", viewport.surface_size());
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if !self.is_disposed() {
            self.scroll.handle_window_event(event);
        }
    }

    /// Stop the loop and release the renderer and every registered listener.
    /// Idempotent.
    pub fn dispose(&mut self) {
        self.disposed.dispose();
        if self.renderer.is_disposed() && self.teardown.is_empty() {
            return;
        }
        self.renderer.dispose();
        self.scroll.dispose();
        for f in self.teardown.drain(..) {
            f();
        }
        log::info!("hero planet disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_disposed()
    }

    pub fn dispose_signal(&self) -> DisposeSignal {
        self.disposed.clone()
    }

    /// Smoothed timeline playhead.
    pub fn progress(&self) -> f32 {
        self.scrub.current()
    }

    pub fn camera_position(&self) -> Point3<f32> {
        self.scene.camera.position
    }

    pub fn earth_rotation(&self) -> f32 {
        self.scene.earth_rotation()
    }

    pub fn scene(&self) -> &PlanetScene {
        &self.scene
    }

    pub fn timeline(&self) -> &HeroTimeline {
        &self.timeline
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
