//! Application event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`] hosting one [`HeroPlanet`].
//!
//! # Lifecycle Flow
//!
//! 1. `resumed` creates the window (on the web: adopts the planet canvas) and
//!    mounts the planet; texture loads are spawned and never awaited
//! 2. every `RedrawRequested` runs one planet frame and requests the next one
//! 3. resizes and scale factor changes are forwarded to the planet
//! 4. decoded textures arrive as [`FlowEvent::TextureDecoded`]
//! 5. `CloseRequested` or [`FlowEvent::Dispose`] dispose the planet and exit

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::PlanetConfig,
    context::Context,
    overlay::OverlaySink,
    planet::{DisposeSignal, HeroPlanet, PageHooks},
    render::PlanetRenderer,
    resources::texture::{DecodedTexture, spawn_earth_textures},
    scene::PlanetScene,
    scroll::ScrollObserver,
    ticker::Ticker,
    viewport::Viewport,
};

pub(crate) enum FlowEvent {
    /// The web mount finished on the `spawn_local` task.
    #[cfg(target_arch = "wasm32")]
    Initialized(anyhow::Result<HeroPlanet<PlanetRenderer>>),
    TextureDecoded(DecodedTexture),
    Dispose,
}

impl std::fmt::Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_arch = "wasm32")]
            Self::Initialized(result) => f
                .debug_tuple("Initialized")
                .field(&result.as_ref().map(|_| "HeroPlanet"))
                .finish(),
            Self::TextureDecoded(decoded) => {
                f.debug_tuple("TextureDecoded").field(&decoded.slot).finish()
            }
            Self::Dispose => f.write_str("Dispose"),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    config: PlanetConfig,
    #[cfg(target_arch = "wasm32")]
    canvas: Option<web_sys::HtmlCanvasElement>,
    disposed: DisposeSignal,
    window: Option<Arc<Window>>,
    planet: Option<HeroPlanet<PlanetRenderer>>,
}

impl App {
    pub(crate) fn new(
        event_loop: &EventLoop<FlowEvent>,
        config: PlanetConfig,
        #[cfg(target_arch = "wasm32")] canvas: web_sys::HtmlCanvasElement,
        disposed: DisposeSignal,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            config,
            #[cfg(target_arch = "wasm32")]
            canvas: Some(canvas),
            disposed,
            window: None,
            planet: None,
        })
    }

    fn spawn_textures(&self) {
        let proxy = self.proxy.clone();
        spawn_earth_textures(
            #[cfg(not(target_arch = "wasm32"))]
            &self.async_runtime,
            &self.config.textures,
            move |decoded| {
                if proxy.send_event(FlowEvent::TextureDecoded(decoded)).is_err() {
                    log::debug!("event loop closed before a texture arrived");
                }
            },
        );
    }

    /// Hand a freshly mounted planet to the loop.
    fn start(&mut self, event_loop: &ActiveEventLoop, mut planet: HeroPlanet<PlanetRenderer>) {
        if planet.is_disposed() {
            // disposed while the GPU was still being set up
            planet.dispose();
            event_loop.exit();
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = &self.window {
                match crate::web::ResizeListener::register(window.clone()) {
                    Ok(listener) => planet.on_dispose(move || listener.unregister()),
                    Err(e) => log::error!("cannot listen for page resizes: {:#}", e),
                }
            }
        }

        self.planet = Some(planet);
        self.spawn_textures();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn dispose(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(planet) = self.planet.as_mut() {
            planet.dispose();
        }
        self.planet = None;
        self.window = None;
        event_loop.exit();
    }
}

/// Logical viewport of the planet. On the web this is the page's inner size,
/// which the canvas is kept in sync with.
#[cfg(target_arch = "wasm32")]
fn current_viewport(_window: &Window) -> anyhow::Result<Viewport> {
    crate::web::page_viewport()
}

#[cfg(not(target_arch = "wasm32"))]
fn current_viewport(window: &Window) -> anyhow::Result<Viewport> {
    Viewport::from_physical(window.inner_size(), window.scale_factor())
}

fn page_hooks(config: &PlanetConfig, viewport: &Viewport) -> anyhow::Result<PageHooks> {
    #[cfg(not(target_arch = "wasm32"))]
    let (scroll, overlay): (Box<dyn ScrollObserver>, Box<dyn OverlaySink>) = (
        Box::new(crate::scroll::WheelScroll::new(viewport)),
        Box::new(crate::overlay::LoggedOverlay::default()),
    );

    #[cfg(target_arch = "wasm32")]
    let (scroll, overlay): (Box<dyn ScrollObserver>, Box<dyn OverlaySink>) = {
        use anyhow::Context as _;

        let _ = viewport;
        let window = web_sys::window().context("no global window")?;
        let document = window.document().context("window has no document")?;
        let overlay: Box<dyn OverlaySink> =
            match crate::overlay::DomOverlay::find(&document, &config.selectors.overlay) {
                Some(overlay) => Box::new(overlay),
                None => Box::new(crate::overlay::LoggedOverlay::default()),
            };
        (
            Box::new(crate::scroll::DomScroll::find(
                window,
                &config.selectors.trigger,
            )),
            overlay,
        )
    };

    Ok(PageHooks {
        scheduler: Box::new(Ticker::new(config.lag_smoothing)),
        scroll,
        overlay,
    })
}

async fn mount(
    window: Arc<Window>,
    config: PlanetConfig,
    disposed: DisposeSignal,
) -> anyhow::Result<HeroPlanet<PlanetRenderer>> {
    let viewport = current_viewport(&window)?;
    let ctx = Context::new(window, &viewport).await?;
    let scene = PlanetScene::build(&config, &viewport);
    let renderer = PlanetRenderer::new(ctx, &scene);
    let hooks = page_hooks(&config, &viewport)?;
    Ok(HeroPlanet::mount(
        &config, scene, viewport, renderer, hooks, disposed,
    ))
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.config.title);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            // page scrolling drives the animation, so wheel events must reach the page
            window_attributes = window_attributes
                .with_canvas(self.canvas.take())
                .with_prevent_default(false);
            if let Ok(viewport) = crate::web::page_viewport() {
                window_attributes = window_attributes.with_inner_size(
                    winit::dpi::LogicalSize::new(viewport.width(), viewport.height()),
                );
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("cannot create the planet window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let init_future = mount(window, self.config.clone(), self.disposed.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok(planet) => self.start(event_loop, planet),
                Err(e) => {
                    log::error!("cannot mount the hero planet: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = init_future.await;
                if proxy.send_event(FlowEvent::Initialized(result)).is_err() {
                    log::warn!("event loop closed before the planet was mounted");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            FlowEvent::Initialized(result) => match result {
                Ok(planet) => self.start(event_loop, planet),
                Err(e) => {
                    log::error!("cannot mount the hero planet: {:#}", e);
                    event_loop.exit();
                }
            },
            FlowEvent::TextureDecoded(decoded) => {
                if let Some(planet) = self.planet.as_mut() {
                    if !planet.is_disposed() {
                        planet
                            .renderer_mut()
                            .set_texture(decoded.slot, &decoded.image);
                    }
                }
            }
            FlowEvent::Dispose => self.dispose(event_loop),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            self.dispose(event_loop);
            return;
        }
        let (Some(planet), Some(window)) = (self.planet.as_mut(), self.window.as_ref()) else {
            return;
        };

        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                match current_viewport(window) {
                    Ok(viewport) => planet.resize(viewport),
                    // minimised windows report a zero size
                    Err(e) => log::debug!("ignoring resize: {:#}", e),
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = planet.frame() {
                    log::error!("Unable to render {:#}", e);
                }
                if planet.is_disposed() {
                    log::debug!("render loop stopped");
                } else {
                    // invoke main render loop
                    window.request_redraw();
                }
            }
            other => planet.handle_window_event(&other),
        }
    }
}

/// Open a window with the hero planet and block until it is closed.
#[cfg(not(target_arch = "wasm32"))]
pub fn run(config: PlanetConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config, DisposeSignal::new())?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
