use planet_hero::{
    config::TexturePaths,
    data_structures::texture::{ColourSpace, mip_level_count},
    resources::texture::EarthTexture,
};

#[test]
fn should_count_a_full_mip_chain() {
    assert_eq!(mip_level_count(1, 1), 1);
    assert_eq!(mip_level_count(2048, 1024), 12);
    assert_eq!(mip_level_count(1000, 3), 10);
    assert_eq!(mip_level_count(0, 0), 1);
}

#[test]
fn colour_maps_should_be_srgb_and_data_maps_linear() {
    assert_eq!(EarthTexture::Day.colour_space(), ColourSpace::Srgb);
    assert_eq!(EarthTexture::Night.colour_space(), ColourSpace::Srgb);
    assert_eq!(EarthTexture::SpecularClouds.colour_space(), ColourSpace::Linear);
}

#[test]
fn should_resolve_every_map_path() {
    let paths = TexturePaths::default();

    let resolved: Vec<&str> = EarthTexture::ALL
        .iter()
        .map(|slot| slot.path(&paths))
        .collect();

    assert_eq!(
        resolved,
        vec!["earth/day.jpg", "earth/night.jpg", "earth/specularClouds.jpg"]
    );
}
