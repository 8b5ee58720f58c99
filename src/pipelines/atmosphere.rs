//! Atmosphere material: back faces only, alpha blended, no depth writes.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{MaterialState, mk_pipeline_layout, mk_render_pipeline, uniform_entry},
    shading::ObjectUniform,
};

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_entry(0)],
        label: Some("atmosphere_bind_group_layout"),
    })
}

pub fn mk_atmosphere_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    atmosphere_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Atmosphere Pipeline Layout",
        camera_bind_group_layout,
        atmosphere_bind_group_layout,
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Atmosphere Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("atmosphere.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(Texture::DEPTH_FORMAT),
        MaterialState {
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            cull_mode: Some(wgpu::Face::Front),
            depth_write_enabled: false,
        },
        shader,
    )
}

#[derive(Debug)]
pub struct AtmosphereMaterial {
    pub pipeline: wgpu::RenderPipeline,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl AtmosphereMaterial {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        uniform: ObjectUniform,
    ) -> Self {
        let layout = mk_bind_group_layout(device);
        let pipeline =
            mk_atmosphere_pipeline(device, color_format, camera_bind_group_layout, &layout);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Atmosphere Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("atmosphere_bind_group"),
        });
        Self {
            pipeline,
            buffer,
            bind_group,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: ObjectUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }
}
