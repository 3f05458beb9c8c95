use std::path::Path;

use anyhow::Context;

use crate::{
    assets::ImageResource, foundation::error::CovergenResult,
    render::composite::premultiply_in_place,
};

/// Decode PNG/JPEG/... bytes into a premultiplied [`ImageResource`].
pub fn decode_image(bytes: &[u8]) -> CovergenResult<ImageResource> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    from_rgba_image(dyn_img.to_rgba8())
}

pub fn load_image(path: &Path) -> CovergenResult<ImageResource> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Take ownership of a straight-alpha RGBA image.
pub fn from_rgba_image(rgba: image::RgbaImage) -> CovergenResult<ImageResource> {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_in_place(&mut rgba8_premul);
    ImageResource::from_premul_rgba8(width, height, rgba8_premul)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
