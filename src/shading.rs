//! Planet shading model.
//!
//! [`ShadingUniforms`] are the material inputs shared by the Earth and the
//! atmosphere programs (`pipelines/earth.wgsl`, `pipelines/atmosphere.wgsl`).
//! The functions below evaluate the same per-pixel math on the CPU; they are
//! the reference the WGSL is checked against and have no state of their own.

use cgmath::{InnerSpace, Vector2, Vector3, Vector4};

use crate::config::PlanetConfig;

/// Material inputs, constant for every pixel of a draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingUniforms {
    /// Unit vector pointing from the planet towards the sun.
    pub sun_direction: Vector3<f32>,
    pub atmosphere_day: Vector3<f32>,
    pub atmosphere_twilight: Vector3<f32>,
    pub opacity: f32,
}

impl ShadingUniforms {
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self {
            sun_direction: config.sun.direction().normalize(),
            atmosphere_day: config.atmosphere_day.into(),
            atmosphere_twilight: config.atmosphere_twilight.into(),
            opacity: 1.0,
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }
}

/// Geometry and texel samples for one Earth pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// World-space surface normal.
    pub normal: Vector3<f32>,
    /// Direction from the camera to the surface point.
    pub view_direction: Vector3<f32>,
    pub day: Vector3<f32>,
    pub night: Vector3<f32>,
    /// Red channel is the specular (ocean) mask, green the cloud cover.
    pub specular_clouds: Vector2<f32>,
}

/// Hermite interpolation between two edges, as in WGSL's `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn mix(a: Vector3<f32>, b: Vector3<f32>, t: f32) -> Vector3<f32> {
    a * (1.0 - t) + b * t
}

fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Blend weight of the day map: 0 on the night side, 1 in full daylight, with
/// a soft terminator in between.
pub fn day_mix(sun_orientation: f32) -> f32 {
    smoothstep(-0.25, 0.5, sun_orientation)
}

/// Atmosphere tint shared by both programs, twilight towards the terminator.
pub fn atmosphere_tint(uniforms: &ShadingUniforms, sun_orientation: f32) -> (Vector3<f32>, f32) {
    let atmosphere_day_mix = smoothstep(-0.5, 1.0, sun_orientation);
    (
        mix(
            uniforms.atmosphere_twilight,
            uniforms.atmosphere_day,
            atmosphere_day_mix,
        ),
        atmosphere_day_mix,
    )
}

/// Linear RGBA of one Earth pixel.
pub fn earth_colour(uniforms: &ShadingUniforms, sample: &SurfaceSample) -> Vector4<f32> {
    let normal = sample.normal.normalize();
    let view_direction = sample.view_direction.normalize();
    let sun_orientation = uniforms.sun_direction.dot(normal);

    let day_mix = day_mix(sun_orientation);
    let clouds = smoothstep(0.5, 1.0, sample.specular_clouds.y);
    let night = sample.night * (1.0 - clouds);
    let mut colour = mix(night, sample.day, day_mix);
    colour = mix(colour, Vector3::new(1.0, 1.0, 1.0), clouds * day_mix);

    let fresnel = (view_direction.dot(normal) + 1.0).powi(2);
    let (atmosphere, atmosphere_day_mix) = atmosphere_tint(uniforms, sun_orientation);
    colour = mix(colour, atmosphere, fresnel * atmosphere_day_mix);

    let reflection = reflect(-uniforms.sun_direction, normal);
    let specular = (-reflection.dot(view_direction)).max(0.0).powi(32) * sample.specular_clouds.x;
    let specular_colour = mix(Vector3::new(1.0, 1.0, 1.0), atmosphere, fresnel);
    colour += specular_colour * specular;

    colour.extend(uniforms.opacity)
}

/// Linear RGBA of one atmosphere pixel (back face of the outer shell).
pub fn atmosphere_colour(
    uniforms: &ShadingUniforms,
    normal: Vector3<f32>,
    view_direction: Vector3<f32>,
) -> Vector4<f32> {
    let normal = normal.normalize();
    let view_direction = view_direction.normalize();
    let sun_orientation = uniforms.sun_direction.dot(normal);

    let (colour, _) = atmosphere_tint(uniforms, sun_orientation);
    let edge_alpha = smoothstep(0.0, 0.5, view_direction.dot(normal));
    let day_alpha = smoothstep(-0.5, 0.0, sun_orientation);

    colour.extend(edge_alpha * day_alpha * uniforms.opacity)
}

/// Per-object uniform as laid out in the shaders' `ObjectUniform`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
    sun_direction: [f32; 4],
    atmosphere_day: [f32; 4],
    atmosphere_twilight: [f32; 4],
    // x: opacity
    params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: cgmath::Matrix4<f32>, uniforms: &ShadingUniforms) -> Self {
        Self {
            model: model.into(),
            sun_direction: uniforms.sun_direction.extend(0.0).into(),
            atmosphere_day: uniforms.atmosphere_day.extend(1.0).into(),
            atmosphere_twilight: uniforms.atmosphere_twilight.extend(1.0).into(),
            params: [uniforms.opacity, 0.0, 0.0, 0.0],
        }
    }
}
