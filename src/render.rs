//! Render composition and the planet renderer.
//!
//! [`Renderer`] is the seam between the render loop and the GPU: the loop only
//! ever asks it to draw a [`PlanetScene`], follow the surface size, or tear
//! down. [`PlanetRenderer`] is the wgpu implementation.
//!
//! Inside the renderer every mesh reports how it wants to be drawn as a
//! [`Render`]; draw calls are batched so opaque meshes go first and blended
//! ones are drawn over them.

use std::iter;

use anyhow::anyhow;
use image::{DynamicImage, imageops::FilterType};

use crate::{
    camera::CameraResources,
    context::Context,
    data_structures::{
        scene_graph::MeshKind,
        sphere::SphereMesh,
        texture::Texture,
    },
    pipelines::{atmosphere::AtmosphereMaterial, earth::EarthMaterial},
    resources::texture::EarthTexture,
    scene::PlanetScene,
    viewport::SurfaceSize,
};

pub trait Renderer {
    /// Draw one frame. After [`Renderer::dispose`] this does nothing and
    /// succeeds.
    fn render(&mut self, scene: &PlanetScene) -> anyhow::Result<()>;

    fn resize(&mut self, size: SurfaceSize);

    /// Release every GPU resource. Idempotent.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// A mesh with the pipeline and material bind group it is drawn with.
pub struct Drawable<'a> {
    pub mesh: &'a SphereMesh,
    pub pipeline: &'a wgpu::RenderPipeline,
    pub bind_group: &'a wgpu::BindGroup,
}

/// Specifies how a mesh should be rendered.
///
/// - `Opaque` is drawn first, writing depth
/// - `Transparent` is drawn after all opaque meshes
/// - `Composed` renders a composition of multiple renders
pub enum Render<'a> {
    Opaque(Drawable<'a>),
    Transparent(Drawable<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(
        self,
        opaque: &mut Vec<Drawable<'a>>,
        transparent: &mut Vec<Drawable<'a>>,
    ) {
        match self {
            Render::Opaque(drawable) => opaque.push(drawable),
            Render::Transparent(drawable) => transparent.push(drawable),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(opaque, transparent)),
        }
    }
}

#[derive(Debug)]
struct Gpu {
    ctx: Context,
    camera: CameraResources,
    sphere: SphereMesh,
    earth: EarthMaterial,
    atmosphere: AtmosphereMaterial,
}

impl Gpu {
    fn render_list(&self) -> Render<'_> {
        Render::Composed(vec![
            Render::Opaque(Drawable {
                mesh: &self.sphere,
                pipeline: &self.earth.pipeline,
                bind_group: &self.earth.bind_group,
            }),
            Render::Transparent(Drawable {
                mesh: &self.sphere,
                pipeline: &self.atmosphere.pipeline,
                bind_group: &self.atmosphere.bind_group,
            }),
        ])
    }

    fn upload(&mut self, scene: &PlanetScene) {
        self.camera.write(&self.ctx.queue, &scene.camera);
        self.earth
            .write(&self.ctx.queue, scene.object_uniform(MeshKind::Earth));
        self.atmosphere
            .write(&self.ctx.queue, scene.object_uniform(MeshKind::Atmosphere));
    }

    fn draw(&self, view: &wgpu::TextureView, depth_view: &wgpu::TextureView) {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut opaque = Vec::new();
            let mut transparent = Vec::new();
            self.render_list()
                .set_pipelines(&mut opaque, &mut transparent);

            render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
            for drawable in opaque.into_iter().chain(transparent) {
                render_pass.set_pipeline(drawable.pipeline);
                render_pass.set_bind_group(1, drawable.bind_group, &[]);
                drawable.mesh.draw(&mut render_pass);
            }
        }
        self.ctx.queue.submit(iter::once(encoder.finish()));
    }
}

/// wgpu renderer of the planet scene.
///
/// Owns the [`Context`], so disposing the renderer also releases the surface
/// lease.
#[derive(Debug)]
pub struct PlanetRenderer {
    gpu: Option<Gpu>,
}

impl PlanetRenderer {
    /// Allocate meshes and materials. The Earth starts out with placeholder
    /// textures; see [`PlanetRenderer::set_texture`].
    pub fn new(ctx: Context, scene: &PlanetScene) -> Self {
        let camera = CameraResources::new(&ctx.device);
        let sphere = SphereMesh::new(&ctx.device, "planet sphere", scene.geometry());
        let earth = EarthMaterial::new(
            &ctx.device,
            &ctx.queue,
            ctx.config.format,
            &camera.bind_group_layout,
            scene.object_uniform(MeshKind::Earth),
            ctx.max_anisotropy,
        );
        let atmosphere = AtmosphereMaterial::new(
            &ctx.device,
            ctx.config.format,
            &camera.bind_group_layout,
            scene.object_uniform(MeshKind::Atmosphere),
        );
        log::info!("planet renderer ready");

        let mut gpu = Gpu {
            ctx,
            camera,
            sphere,
            earth,
            atmosphere,
        };
        gpu.upload(scene);
        Self { gpu: Some(gpu) }
    }

    /// Replace the placeholder of `slot` with a decoded image. Images larger
    /// than the device allows are scaled down first.
    pub fn set_texture(&mut self, slot: EarthTexture, image: &DynamicImage) {
        let Some(gpu) = self.gpu.as_mut() else {
            log::debug!("{:?} arrived after dispose, dropped", slot);
            return;
        };
        let limit = gpu.ctx.device.limits().max_texture_dimension_2d;
        let scaled;
        let image = if image.width() > limit || image.height() > limit {
            log::warn!(
                "{:?} is {}x{}, scaling to fit {}",
                slot,
                image.width(),
                image.height(),
                limit
            );
            scaled = image.resize(limit, limit, FilterType::Triangle);
            &scaled
        } else {
            image
        };
        let texture = Texture::from_image(
            &gpu.ctx.device,
            &gpu.ctx.queue,
            image,
            slot.label(),
            slot.colour_space(),
        );
        gpu.earth.set_texture(&gpu.ctx.device, slot, texture);
    }

    /// Render one frame offscreen and read it back.
    #[cfg(feature = "integration-tests")]
    pub async fn render_to_image(
        &mut self,
        scene: &PlanetScene,
    ) -> anyhow::Result<image::RgbaImage> {
        use anyhow::Context as _;
        use instant::Duration;

        let gpu = self
            .gpu
            .as_mut()
            .context("the renderer has been disposed")?;
        gpu.upload(scene);

        let SurfaceSize { width, height } = gpu.ctx.size();
        // rows of the readback buffer must be 256 byte aligned
        let padded_width = width.div_ceil(64) * 64;
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = gpu.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Output Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: gpu.ctx.config.format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth = Texture::create_depth_texture(&gpu.ctx.device, [width, height], "test depth");
        gpu.draw(
            &target.create_view(&wgpu::TextureViewDescriptor::default()),
            &depth.view,
        );

        let u32_size = std::mem::size_of::<u32>() as u32;
        let output_buffer = gpu.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            size: (u32_size * padded_width * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: Some("Golden Image Readback Buffer"),
            mapped_at_creation: false,
        });
        let mut encoder = gpu
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(u32_size * padded_width),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );
        gpu.ctx.queue.submit(iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        gpu.ctx
            .device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .context("GPU did not finish the test frame")?;
        rx.receive()
            .await
            .context("readback callback was dropped")?
            .context("cannot map the readback buffer")?;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            let row_bytes = (u32_size * width) as usize;
            data.chunks((u32_size * padded_width) as usize)
                .take(height as usize)
                .flat_map(|row| row[..row_bytes].iter().copied())
                .collect::<Vec<u8>>()
        };
        output_buffer.unmap();
        image::RgbaImage::from_raw(width, height, pixels)
            .context("readback buffer does not match the frame size")
    }
}

impl Renderer for PlanetRenderer {
    fn render(&mut self, scene: &PlanetScene) -> anyhow::Result<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        gpu.upload(scene);

        let output = match gpu.ctx.surface_texture() {
            Ok(Some(output)) => output,
            Ok(None) => {
                log::trace!("headless context, nothing to present");
                return Ok(());
            }
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                gpu.ctx.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(anyhow!("unable to render: {}", e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        gpu.draw(&view, &gpu.ctx.depth_texture.view);
        output.present();
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.ctx.resize(size);
        }
    }

    fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.ctx.device.destroy();
            drop(gpu);
            log::info!("planet renderer disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.gpu.is_none()
    }
}
