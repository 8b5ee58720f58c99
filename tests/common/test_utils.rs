use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use cgmath::Point3;
use planet_hero::{
    DisposeSignal, HeroPlanet, PageHooks, PlanetConfig, PlanetScene, Renderer, Viewport,
    overlay::{OverlaySink, OverlayStyle},
    scroll::ScrollObserver,
    ticker::{FrameScheduler, Tick},
    viewport::SurfaceSize,
};

/// What the recording renderer was asked to do.
#[derive(Debug, Default)]
pub(crate) struct RenderLog {
    pub renders: u32,
    pub disposals: u32,
    pub resizes: Vec<SurfaceSize>,
    pub cameras: Vec<Point3<f32>>,
    pub rotations: Vec<f32>,
    pub aspects: Vec<f32>,
    pub scroll_refreshes: Vec<f32>,
    pub scroll_disposals: u32,
}

pub(crate) struct RecordingRenderer {
    log: Rc<RefCell<RenderLog>>,
    disposed: bool,
}

impl RecordingRenderer {
    pub fn new(log: Rc<RefCell<RenderLog>>) -> Self {
        Self {
            log,
            disposed: false,
        }
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &PlanetScene) -> anyhow::Result<()> {
        if self.disposed {
            return Ok(());
        }
        let mut log = self.log.borrow_mut();
        log.renders += 1;
        log.cameras.push(scene.camera.position);
        log.rotations.push(scene.earth_rotation());
        log.aspects.push(scene.camera.aspect());
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.log.borrow_mut().resizes.push(size);
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.log.borrow_mut().disposals += 1;
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Scheduler whose time is set by the test.
pub(crate) struct ManualScheduler {
    clock: Rc<Cell<f64>>,
    last: f64,
    frame: u64,
}

impl FrameScheduler for ManualScheduler {
    fn tick(&mut self) -> Tick {
        let time = self.clock.get();
        let delta = time - self.last;
        self.last = time;
        self.frame += 1;
        Tick {
            time,
            delta,
            frame: self.frame,
        }
    }
}

/// Scroll observer whose progress is set by the test.
pub(crate) struct ScriptedScroll {
    progress: Rc<Cell<f32>>,
    log: Rc<RefCell<RenderLog>>,
}

impl ScrollObserver for ScriptedScroll {
    fn progress(&mut self) -> f32 {
        self.progress.get()
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.log.borrow_mut().scroll_refreshes.push(viewport.width());
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().scroll_disposals += 1;
    }
}

pub(crate) struct RecordingOverlay(Rc<RefCell<Vec<OverlayStyle>>>);

impl OverlaySink for RecordingOverlay {
    fn apply(&mut self, style: &OverlayStyle) {
        self.0.borrow_mut().push(*style);
    }
}

/// A mounted planet wired to test doubles, plus handles to drive and inspect
/// them.
pub(crate) struct Harness {
    pub planet: HeroPlanet<RecordingRenderer>,
    pub clock: Rc<Cell<f64>>,
    pub scroll: Rc<Cell<f32>>,
    pub overlay: Rc<RefCell<Vec<OverlayStyle>>>,
    pub log: Rc<RefCell<RenderLog>>,
    pub signal: DisposeSignal,
}

impl Harness {
    pub fn mount(config: &PlanetConfig, viewport: Viewport) -> Self {
        Self::mount_scrolled(config, viewport, 0.0)
    }

    pub fn mount_scrolled(config: &PlanetConfig, viewport: Viewport, progress: f32) -> Self {
        let clock = Rc::new(Cell::new(0.0));
        let scroll = Rc::new(Cell::new(progress));
        let overlay = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::new(RefCell::new(RenderLog::default()));
        let signal = DisposeSignal::new();

        let hooks = PageHooks {
            scheduler: Box::new(ManualScheduler {
                clock: clock.clone(),
                last: 0.0,
                frame: 0,
            }),
            scroll: Box::new(ScriptedScroll {
                progress: scroll.clone(),
                log: log.clone(),
            }),
            overlay: Box::new(RecordingOverlay(overlay.clone())),
        };
        let scene = PlanetScene::build(config, &viewport);
        let planet = HeroPlanet::mount(
            config,
            scene,
            viewport,
            RecordingRenderer::new(log.clone()),
            hooks,
            signal.clone(),
        );

        Self {
            planet,
            clock,
            scroll,
            overlay,
            log,
            signal,
        }
    }

    /// Run one frame at ticker time `time`.
    pub fn frame_at(&mut self, time: f64) {
        self.clock.set(time);
        self.planet.frame().expect("frame failed");
    }

    /// Scroll to `progress` and run frames until the scrub has caught up.
    pub fn scroll_and_settle(&mut self, progress: f32) {
        self.scroll.set(progress);
        let start = self.clock.get();
        for step in 1..=40 {
            self.frame_at(start + step as f64 * 0.1);
        }
    }

    pub fn renders(&self) -> u32 {
        self.log.borrow().renders
    }
}

pub(crate) fn desktop() -> Viewport {
    Viewport::new(1280.0, 720.0, 1.0).expect("valid viewport")
}

pub(crate) fn mobile() -> Viewport {
    Viewport::new(390.0, 844.0, 3.0).expect("valid viewport")
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn assert_point_close(actual: Point3<f32>, expected: Point3<f32>) {
    assert_close(actual.x, expected.x);
    assert_close(actual.y, expected.y);
    assert_close(actual.z, expected.z);
}

/// Render one frame of `config` offscreen at `viewport` and read it back.
#[cfg(feature = "integration-tests")]
pub(crate) fn render_offscreen(config: &PlanetConfig, viewport: Viewport) -> image::RgbaImage {
    render_offscreen_with(config, viewport, &[])
}

/// Like [`render_offscreen`], with `textures` uploaded over the placeholders
/// first.
#[cfg(feature = "integration-tests")]
pub(crate) fn render_offscreen_with(
    config: &PlanetConfig,
    viewport: Viewport,
    textures: &[(planet_hero::resources::texture::EarthTexture, image::DynamicImage)],
) -> image::RgbaImage {
    use planet_hero::{PlanetRenderer, context::Context};

    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    runtime.block_on(async {
        let ctx = Context::headless(viewport.surface_size())
            .await
            .expect("headless context");
        let scene = PlanetScene::build(config, &viewport);
        let mut renderer = PlanetRenderer::new(ctx, &scene);
        for (slot, image) in textures {
            renderer.set_texture(*slot, image);
        }
        renderer
            .render_to_image(&scene)
            .await
            .expect("offscreen frame")
    })
}
