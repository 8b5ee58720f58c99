use cgmath::{InnerSpace, Point3, Transform as _, Vector3, Vector4};
use planet_hero::{
    PlanetConfig, PlanetScene,
    data_structures::{scene_graph::MeshKind, sphere::SphereGeometry},
};

use crate::common::test_utils::{assert_close, desktop};

mod common;

#[test]
fn should_tessellate_the_default_sphere() {
    let geometry = SphereGeometry::new(2.0, 64, 64);

    assert_eq!(geometry.vertices.len(), 65 * 65);
    // one triangle per segment at each pole ring, two everywhere else
    assert_eq!(geometry.triangle_count(), 62 * 128 + 2 * 64);
    assert!(
        geometry
            .indices
            .iter()
            .all(|&i| (i as usize) < geometry.vertices.len())
    );
}

#[test]
fn should_place_vertices_on_the_radius() {
    let geometry = SphereGeometry::new(2.0, 16, 12);

    for vertex in &geometry.vertices {
        let position = Vector3::from(vertex.position);
        let normal = Vector3::from(vertex.normal);
        assert_close(position.magnitude(), 2.0);
        assert_close(normal.magnitude(), 1.0);
        assert!((position / 2.0 - normal).magnitude() < 1e-4);
    }
}

#[test]
fn should_map_poles_to_the_texture_edges() {
    let geometry = SphereGeometry::new(1.0, 8, 4);

    let north = geometry.vertices[0];
    let south = geometry.vertices[geometry.vertices.len() - 1];

    assert_close(north.position[1], 1.0);
    assert_close(north.tex_coords[1], 0.0);
    assert_close(south.position[1], -1.0);
    assert_close(south.tex_coords[1], 1.0);
}

#[test]
fn should_clamp_degenerate_segment_counts() {
    let geometry = SphereGeometry::new(1.0, 0, 0);

    assert_eq!(geometry.vertices.len(), 4 * 3);
    assert!(geometry.triangle_count() > 0);
}

#[test]
fn atmosphere_should_enclose_the_earth() {
    let config = PlanetConfig::default();
    let scene = PlanetScene::build(&config, &desktop());

    let world = scene
        .planet
        .world_matrix(MeshKind::Atmosphere)
        .expect("atmosphere node");
    let edge = world.transform_point(Point3::new(2.0, 0.0, 0.0));

    assert_close(edge.x, 2.26);
    assert_eq!(scene.planet.children().len(), 2);
}

#[test]
fn earth_should_spin_around_its_y_axis() {
    let config = PlanetConfig::default();
    let mut scene = PlanetScene::build(&config, &desktop());

    scene.set_earth_rotation(std::f32::consts::FRAC_PI_2);
    let world = scene
        .planet
        .world_matrix(MeshKind::Earth)
        .expect("earth node");
    let turned = world * Vector4::new(1.0, 0.0, 0.0, 1.0);

    assert_close(scene.earth_rotation(), std::f32::consts::FRAC_PI_2);
    assert_close(turned.x, 0.0);
    assert_close(turned.y, 0.0);
    assert_close(turned.z, -1.0);

    let atmosphere = scene.planet.find(MeshKind::Atmosphere).expect("atmosphere node");
    assert_eq!(atmosphere.transform.rotation.y, 0.0);
}

#[test]
fn atmosphere_should_carry_its_own_opacity() {
    let config = PlanetConfig::default().with_atmosphere_opacity(0.4);
    let scene = PlanetScene::build(&config, &desktop());

    assert_eq!(scene.shading(MeshKind::Earth).opacity, 1.0);
    assert_close(scene.shading(MeshKind::Atmosphere).opacity, 0.4);
}
