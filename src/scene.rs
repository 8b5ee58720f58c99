//! The hero scene: camera, planet group and material inputs.
//!
//! [`PlanetScene`] is plain data. The render loop mutates it (camera position,
//! Earth spin) and a [`crate::render::Renderer`] turns it into pixels.

use cgmath::{Deg, Point3};

use crate::{
    camera::PerspectiveCamera,
    config::PlanetConfig,
    data_structures::{
        scene_graph::{Group, MeshKind, Node},
        sphere::SphereGeometry,
        transform::Transform,
    },
    shading::{ObjectUniform, ShadingUniforms},
    viewport::Viewport,
};

pub const EARTH: &str = "earth";
pub const ATMOSPHERE: &str = "atmosphere";

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetScene {
    pub camera: PerspectiveCamera,
    pub planet: Group,
    earth_shading: ShadingUniforms,
    atmosphere_shading: ShadingUniforms,
    geometry: SphereGeometry,
}

impl PlanetScene {
    pub fn build(config: &PlanetConfig, viewport: &Viewport) -> Self {
        let camera = PerspectiveCamera::new(
            config.camera_start,
            Deg(config.fov_y_degrees),
            viewport.aspect(),
            config.z_near,
            config.z_far,
        );

        let planet = Group::new()
            .add(Node::new(EARTH, MeshKind::Earth, Transform::new()))
            .add(Node::new(
                ATMOSPHERE,
                MeshKind::Atmosphere,
                Transform::uniform_scale(config.atmosphere_scale),
            ));

        let earth_shading = ShadingUniforms::from_config(config);
        let atmosphere_shading = earth_shading.with_opacity(config.atmosphere_opacity);
        let geometry =
            SphereGeometry::new(config.radius, config.width_segments, config.height_segments);
        log::info!(
            "planet scene: {} triangles per sphere, camera at {:?}",
            geometry.triangle_count(),
            camera.position
        );

        Self {
            camera,
            planet,
            earth_shading,
            atmosphere_shading,
            geometry,
        }
    }

    /// Spin the Earth to `angle` radians around its Y axis. The atmosphere is
    /// rotationally symmetric and stays put.
    pub fn set_earth_rotation(&mut self, angle: f32) {
        if let Some(earth) = self.planet.find_mut(MeshKind::Earth) {
            earth.transform.rotation.y = angle;
        }
    }

    pub fn earth_rotation(&self) -> f32 {
        self.planet
            .find(MeshKind::Earth)
            .map(|earth| earth.transform.rotation.y)
            .unwrap_or_default()
    }

    pub fn set_camera_position(&mut self, position: Point3<f32>) {
        self.camera.position = position;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    pub fn shading(&self, kind: MeshKind) -> &ShadingUniforms {
        match kind {
            MeshKind::Earth => &self.earth_shading,
            MeshKind::Atmosphere => &self.atmosphere_shading,
        }
    }

    /// Uniform block of `kind` for the current frame.
    pub fn object_uniform(&self, kind: MeshKind) -> ObjectUniform {
        let model = self
            .planet
            .world_matrix(kind)
            .unwrap_or_else(|| Transform::new().to_matrix());
        ObjectUniform::new(model, self.shading(kind))
    }

    pub fn geometry(&self) -> &SphereGeometry {
        &self.geometry
    }
}
