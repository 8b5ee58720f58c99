use crate::{config::TexturePaths, data_structures::texture::ColourSpace};

/// The three maps sampled by the Earth program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EarthTexture {
    Day,
    Night,
    SpecularClouds,
}

impl EarthTexture {
    pub const ALL: [EarthTexture; 3] = [
        EarthTexture::Day,
        EarthTexture::Night,
        EarthTexture::SpecularClouds,
    ];

    pub fn path(self, paths: &TexturePaths) -> &str {
        match self {
            EarthTexture::Day => &paths.day,
            EarthTexture::Night => &paths.night,
            EarthTexture::SpecularClouds => &paths.specular_clouds,
        }
    }

    pub fn colour_space(self) -> ColourSpace {
        match self {
            EarthTexture::Day | EarthTexture::Night => ColourSpace::Srgb,
            EarthTexture::SpecularClouds => ColourSpace::Linear,
        }
    }

    /// Texel bound before the image arrives: black, no clouds, no specular.
    pub fn placeholder(self) -> [u8; 4] {
        [0, 0, 0, 255]
    }

    pub fn label(self) -> &'static str {
        match self {
            EarthTexture::Day => "earth day texture",
            EarthTexture::Night => "earth night texture",
            EarthTexture::SpecularClouds => "earth specular clouds texture",
        }
    }
}

/// A decoded image ready to be uploaded into its slot.
#[derive(Debug)]
pub struct DecodedTexture {
    pub slot: EarthTexture,
    pub image: image::DynamicImage,
}

/// Receiver of decoded textures. Native loads run on the tokio pool and
/// therefore need a `Send` sink; on the web everything stays on one thread.
#[cfg(not(target_arch = "wasm32"))]
pub trait TextureSink: Fn(DecodedTexture) + Clone + Send + 'static {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Fn(DecodedTexture) + Clone + Send + 'static> TextureSink for T {}

#[cfg(target_arch = "wasm32")]
pub trait TextureSink: Fn(DecodedTexture) + Clone + 'static {}
#[cfg(target_arch = "wasm32")]
impl<T: Fn(DecodedTexture) + Clone + 'static> TextureSink for T {}

/// Start loading every Earth map without waiting for any of them.
///
/// Each successfully decoded image is handed to `on_decoded` from the task that
/// loaded it. Failures are logged and leave the placeholder in place; there is
/// no completion signal and no retry.
pub fn spawn_earth_textures(
    #[cfg(not(target_arch = "wasm32"))] async_runtime: &tokio::runtime::Runtime,
    paths: &TexturePaths,
    on_decoded: impl TextureSink,
) {
    for slot in EarthTexture::ALL {
        let root = paths.root.clone();
        let path = slot.path(paths).to_string();
        let on_decoded = on_decoded.clone();
        let task = async move {
            match super::load_image(&root, &path).await {
                Ok(image) => {
                    log::info!("decoded {} ({}x{})", path, image.width(), image.height());
                    on_decoded(DecodedTexture { slot, image });
                }
                Err(e) => log::error!("Failed to load {:?} from {}: {:#}", slot, path, e),
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        async_runtime.spawn(task);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);
    }
}
