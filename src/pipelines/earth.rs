//! Earth material: the day/night program plus its uniforms and textures.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::{Texture, create_surface_sampler},
    pipelines::basic::{MaterialState, mk_pipeline_layout, mk_render_pipeline, uniform_entry},
    resources::texture::EarthTexture,
    shading::ObjectUniform,
};

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            uniform_entry(0),
            texture_entry(1),
            texture_entry(2),
            texture_entry(3),
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("earth_bind_group_layout"),
    })
}

pub fn mk_earth_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    earth_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Earth Pipeline Layout",
        camera_bind_group_layout,
        earth_bind_group_layout,
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Earth Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("earth.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(Texture::DEPTH_FORMAT),
        MaterialState {
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            cull_mode: Some(wgpu::Face::Back),
            depth_write_enabled: true,
        },
        shader,
    )
}

/// Uniform buffer, textures and bind group of the Earth.
///
/// Textures start out as placeholders and are swapped one by one as their
/// images finish decoding; every swap rebuilds the bind group.
#[derive(Debug)]
pub struct EarthMaterial {
    pub pipeline: wgpu::RenderPipeline,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    layout: wgpu::BindGroupLayout,
    day: Texture,
    night: Texture,
    specular_clouds: Texture,
    sampler: wgpu::Sampler,
}

impl EarthMaterial {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        uniform: ObjectUniform,
        max_anisotropy: u16,
    ) -> Self {
        let layout = mk_bind_group_layout(device);
        let pipeline = mk_earth_pipeline(device, color_format, camera_bind_group_layout, &layout);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Earth Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let placeholder = |slot: EarthTexture| {
            Texture::placeholder(
                device,
                queue,
                slot.placeholder(),
                slot.colour_space(),
                slot.label(),
            )
        };
        let day = placeholder(EarthTexture::Day);
        let night = placeholder(EarthTexture::Night);
        let specular_clouds = placeholder(EarthTexture::SpecularClouds);
        let sampler = create_surface_sampler(device, max_anisotropy);
        let bind_group = mk_bind_group(device, &layout, &buffer, &day, &night, &specular_clouds, &sampler);

        Self {
            pipeline,
            buffer,
            bind_group,
            layout,
            day,
            night,
            specular_clouds,
            sampler,
        }
    }

    pub fn set_texture(&mut self, device: &wgpu::Device, slot: EarthTexture, texture: Texture) {
        match slot {
            EarthTexture::Day => self.day = texture,
            EarthTexture::Night => self.night = texture,
            EarthTexture::SpecularClouds => self.specular_clouds = texture,
        }
        self.bind_group = mk_bind_group(
            device,
            &self.layout,
            &self.buffer,
            &self.day,
            &self.night,
            &self.specular_clouds,
            &self.sampler,
        );
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: ObjectUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    day: &Texture,
    night: &Texture,
    specular_clouds: &Texture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&day.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&night.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(&specular_clouds.view),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("earth_bind_group"),
    })
}
