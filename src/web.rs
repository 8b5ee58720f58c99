//! Browser entry point.
//!
//! `initPlanet3D()` mounts the planet on the page's `canvas.planet-3D` and
//! returns a [`PlanetHandle`] whose `dispose()` must be called when the hero
//! section unmounts.

use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use wasm_bindgen::{JsCast, prelude::*};
use winit::event_loop::{EventLoop, EventLoopProxy};

use crate::{
    config::PlanetConfig,
    context::force_context_loss,
    flow::{App, FlowEvent},
    planet::DisposeSignal,
    viewport::Viewport,
};

/// Control handle of a mounted planet.
#[wasm_bindgen]
pub struct PlanetHandle {
    canvas: web_sys::HtmlCanvasElement,
    disposed: DisposeSignal,
    proxy: EventLoopProxy<FlowEvent>,
}

#[wasm_bindgen]
impl PlanetHandle {
    /// Lose the WebGL context immediately and stop the planet. GPU resources
    /// and the resize listener are released on the next turn of the event
    /// loop.
    pub fn dispose(&self) {
        if self.disposed.is_disposed() {
            return;
        }
        if let Err(e) = force_context_loss(&self.canvas) {
            log::warn!("cannot force WebGL context loss: {:#}", e);
        }
        self.disposed.dispose();
        if self.proxy.send_event(FlowEvent::Dispose).is_err() {
            log::debug!("event loop already stopped");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn disposed(&self) -> bool {
        self.disposed.is_disposed()
    }
}

#[wasm_bindgen(js_name = initPlanet3D)]
pub fn init_planet_3d() -> Result<PlanetHandle, JsValue> {
    mount_with(PlanetConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

/// Mount the planet with a custom configuration.
///
/// winit allows one event loop per page load, so a second mount fails even
/// after the first planet has been disposed.
pub fn mount_with(config: PlanetConfig) -> anyhow::Result<PlanetHandle> {
    use winit::platform::web::EventLoopExtWebSys;

    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already initialised");
    }

    let window = web_sys::window().context("no global window")?;
    let document = window.document().context("window has no document")?;
    let canvas = document
        .query_selector(&config.selectors.canvas)
        .map_err(|e| anyhow!("{:?}", e))?
        .with_context(|| format!("no canvas matches {:?}", config.selectors.canvas))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| anyhow!("{:?} is not a canvas element", config.selectors.canvas))?;

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let proxy = event_loop.create_proxy();
    let disposed = DisposeSignal::new();
    let app = App::new(&event_loop, config, canvas.clone(), disposed.clone())?;
    event_loop.spawn_app(app);

    Ok(PlanetHandle {
        canvas,
        disposed,
        proxy,
    })
}

/// Viewport of the browser window: inner size and device pixel ratio.
pub fn page_viewport() -> anyhow::Result<Viewport> {
    let window = web_sys::window().context("no global window")?;
    let dimension = |value: Result<JsValue, JsValue>, name: &str| -> anyhow::Result<f32> {
        value
            .map_err(|e| anyhow!("{:?}", e))?
            .as_f64()
            .map(|v| v as f32)
            .with_context(|| format!("window.{} is not a number", name))
    };
    Viewport::new(
        dimension(window.inner_width(), "innerWidth")?,
        dimension(window.inner_height(), "innerHeight")?,
        window.device_pixel_ratio() as f32,
    )
}

/// `resize` listener on the page window that keeps the canvas at the page's
/// inner size.
pub(crate) struct ResizeListener {
    window: web_sys::Window,
    closure: Closure<dyn FnMut()>,
}

impl ResizeListener {
    pub(crate) fn register(target: Arc<winit::window::Window>) -> anyhow::Result<Self> {
        let window = web_sys::window().context("no global window")?;
        let closure = Closure::<dyn FnMut()>::new(move || match page_viewport() {
            Ok(viewport) => {
                let _ = target.request_inner_size(winit::dpi::LogicalSize::new(
                    viewport.width(),
                    viewport.height(),
                ));
            }
            Err(e) => log::debug!("ignoring page resize: {:#}", e),
        });
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{:?}", e))?;
        log::debug!("page resize listener registered");
        Ok(Self { window, closure })
    }

    pub(crate) fn unregister(self) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref())
        {
            log::warn!("cannot remove the page resize listener: {:?}", e);
        }
    }
}
