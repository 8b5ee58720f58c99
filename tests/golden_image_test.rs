#[cfg(feature = "integration-tests")]
use crate::common::test_utils::{render_offscreen, render_offscreen_with};
#[cfg(feature = "integration-tests")]
use planet_hero::{PlanetConfig, Viewport};

#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_leave_the_sky_transparent() {
    let config = PlanetConfig::default();
    let viewport = Viewport::new(128.0, 128.0, 1.0).unwrap();

    let image = render_offscreen(&config, viewport);

    assert_eq!((image.width(), image.height()), (128, 128));
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_cover_the_lower_half_with_the_planet() {
    let config = PlanetConfig::default();
    let viewport = Viewport::new(128.0, 128.0, 1.0).unwrap();

    let image = render_offscreen(&config, viewport);

    // the start camera sits above the planet, so its limb crosses the frame
    // just above the middle and the bottom row is solid Earth
    assert_eq!(image.get_pixel(64, 127).0[3], 255);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_not_draw_after_dispose() {
    use planet_hero::{PlanetRenderer, PlanetScene, Renderer, context::Context};

    let config = PlanetConfig::default();
    let viewport = Viewport::new(64.0, 64.0, 1.0).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let ctx = Context::headless(viewport.surface_size()).await.unwrap();
        let scene = PlanetScene::build(&config, &viewport);
        let mut renderer = PlanetRenderer::new(ctx, &scene);

        renderer.dispose();

        assert!(renderer.is_disposed());
        assert!(renderer.render(&scene).is_ok());
        assert!(renderer.render_to_image(&scene).await.is_err());
    });
}

#[test]
#[cfg(feature = "integration-tests")]
fn decoded_maps_should_replace_the_black_placeholder() {
    use image::{DynamicImage, Rgba, RgbaImage};
    use planet_hero::resources::texture::EarthTexture;

    let config = PlanetConfig::default();
    let viewport = Viewport::new(128.0, 128.0, 1.0).unwrap();
    // the bottom of the frame sits near the terminator, so day and night both
    // get the same colour
    let red = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])));

    let placeholder = render_offscreen(&config, viewport);
    let textured = render_offscreen_with(
        &config,
        viewport,
        &[(EarthTexture::Day, red.clone()), (EarthTexture::Night, red)],
    );

    let before = placeholder.get_pixel(64, 127).0;
    let after = textured.get_pixel(64, 127).0;
    assert!(before[0] < 64, "placeholder Earth is dark, got {:?}", before);
    assert!(after[0] > 180, "day map shows on the Earth, got {:?}", after);
    assert!(after[0] > after[2], "red map stays red, got {:?}", after);
}
