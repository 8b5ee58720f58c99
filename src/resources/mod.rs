//! Asset loading.
//!
//! Files are resolved under an asset root: a directory on native (`assets` by
//! default, relative to the working directory) and `<origin>/<root>/` on the
//! web. Loading is asynchronous on both platforms; callers decide whether to
//! await the result or to fire and forget (see [`texture::spawn_earth_textures`]).

pub mod texture;

#[cfg(target_arch = "wasm32")]
fn format_url(root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    use anyhow::Context as _;

    let window = web_sys::window().context("no global window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("cannot read the page origin: {:?}", e))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, root.trim_matches('/')))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(root, file_name)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        use anyhow::Context as _;

        let path = std::path::Path::new(root).join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?
    };

    Ok(data)
}

/// Fetch and decode an image; the format is guessed from its content.
pub async fn load_image(root: &str, file_name: &str) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(root, file_name).await?;
    let img = image::load_from_memory(&data)?;
    Ok(img)
}
