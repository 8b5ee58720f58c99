use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{Context as _, anyhow};
use winit::window::Window;

use crate::{
    data_structures::texture::Texture,
    viewport::{SurfaceSize, Viewport},
};

static SURFACE_LEASED: AtomicBool = AtomicBool::new(false);

/// Proof that the holder owns the process's only planet render surface.
///
/// Released on drop, which happens when the owning [`Context`] is disposed.
#[derive(Debug)]
pub struct SurfaceLease {
    _private: (),
}

impl SurfaceLease {
    pub fn acquire() -> anyhow::Result<Self> {
        SURFACE_LEASED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                anyhow!("a planet surface is already mounted; dispose it before mounting another")
            })?;
        Ok(Self { _private: () })
    }

    pub fn is_held() -> bool {
        SURFACE_LEASED.load(Ordering::Acquire)
    }
}

impl Drop for SurfaceLease {
    fn drop(&mut self) {
        SURFACE_LEASED.store(false, Ordering::Release);
    }
}

/// Device, queue and render target of the planet.
///
/// A windowed context presents to the canvas surface, which keeps the window
/// alive. A headless one has no
/// surface and only renders offscreen.
#[derive(Debug)]
pub struct Context {
    surface: Option<wgpu::Surface<'static>>,
    pub(crate) depth_texture: Texture,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    /// Anisotropy clamp used by the colour map sampler.
    pub max_anisotropy: u16,
    _lease: Option<SurfaceLease>,
}

impl Context {
    pub async fn new(window: Arc<Window>, viewport: &Viewport) -> anyhow::Result<Self> {
        let lease = SurfaceLease::acquire()?;
        let size = viewport.surface_size();

        log::info!("creating the planet surface");
        let instance = instance();
        let surface = instance
            .create_surface(window)
            .context("cannot create a render surface for the planet canvas")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can draw to the planet canvas")?;
        let (device, queue) = request_device(&adapter).await?;

        log::info!("configuring the planet surface for {}x{}", size.width, size.height);
        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour and rely on the surface for sRGB encoding.
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the planet canvas supports no surface format")?;
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "surface {}x{} {:?}, alpha {:?}",
            config.width,
            config.height,
            config.format,
            config.alpha_mode
        );

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            surface: Some(surface),
            depth_texture,
            max_anisotropy: max_anisotropy(&adapter),
            device,
            queue,
            config,
            clear_colour: wgpu::Color::TRANSPARENT,
            _lease: Some(lease),
        })
    }

    /// A context without a window, for rendering into offscreen textures.
    #[cfg(feature = "integration-tests")]
    pub async fn headless(size: SurfaceSize) -> anyhow::Result<Self> {
        let instance = instance();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter available for headless rendering")?;
        let (device, queue) = request_device(&adapter).await?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            surface: None,
            depth_texture,
            max_anisotropy: max_anisotropy(&adapter),
            device,
            queue,
            config,
            clear_colour: wgpu::Color::TRANSPARENT,
            _lease: None,
        })
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.reconfigure();
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
    }

    /// Apply the current configuration to the surface again, e.g. after it was
    /// lost.
    pub fn reconfigure(&self) {
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.config.width,
            height: self.config.height,
        }
    }

    /// Next frame of the surface, or `None` for headless contexts.
    pub(crate) fn surface_texture(
        &self,
    ) -> Result<Option<wgpu::SurfaceTexture>, wgpu::SurfaceError> {
        self.surface
            .as_ref()
            .map(|surface| surface.get_current_texture())
            .transpose()
    }

}

fn instance() -> wgpu::Instance {
    // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        #[cfg(not(target_arch = "wasm32"))]
        backends: wgpu::Backends::PRIMARY,
        #[cfg(target_arch = "wasm32")]
        backends: wgpu::Backends::GL,
        ..Default::default()
    })
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let info = adapter.get_info();
    log::info!("device and queue on {} ({:?})", info.name, info.backend);
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("planet device"),
            required_features: wgpu::Features::empty(),
            // WebGL doesn't support all of wgpu's features, so if
            // we're building for the web we'll have to disable some.
            required_limits: if cfg!(target_arch = "wasm32") {
                wgpu::Limits::downlevel_webgl2_defaults()
            } else {
                wgpu::Limits::default()
            }
            .using_resolution(adapter.limits()),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
            ..Default::default()
        })
        .await
        .context("cannot open the GPU device")
}

fn max_anisotropy(adapter: &wgpu::Adapter) -> u16 {
    if adapter
        .get_downlevel_capabilities()
        .flags
        .contains(wgpu::DownlevelFlags::ANISOTROPIC_FILTERING)
    {
        16
    } else {
        1
    }
}

/// Ask the browser to drop the canvas's WebGL context right away instead of
/// waiting for garbage collection.
#[cfg(target_arch = "wasm32")]
pub fn force_context_loss(canvas: &web_sys::HtmlCanvasElement) -> anyhow::Result<()> {
    use wasm_bindgen::JsCast;

    let gl = canvas
        .get_context("webgl2")
        .map_err(|e| anyhow!("{:?}", e))?
        .context("the planet canvas has no WebGL2 context")?
        .dyn_into::<web_sys::WebGl2RenderingContext>()
        .map_err(|e| anyhow!("{:?}", e))?;
    let extension = gl
        .get_extension("WEBGL_lose_context")
        .map_err(|e| anyhow!("{:?}", e))?
        .context("WEBGL_lose_context is not supported")?;
    extension
        .unchecked_into::<web_sys::WebglLoseContext>()
        .lose_context();
    log::info!("WebGL context released");
    Ok(())
}
