use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    blend,
    error::{CardwrightError, CardwrightResult},
};

#[derive(Clone, Debug)]
/// Decoded raster in premultiplied RGBA8 form.
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

pub fn read_bytes(path: &Path) -> CardwrightResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(CardwrightError::from)
}

pub fn decode_image(bytes: &[u8]) -> CardwrightResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(raster_from_rgba(&dyn_img.to_rgba8()))
}

pub fn load_image(path: &Path) -> CardwrightResult<Raster> {
    decode_image(&read_bytes(path)?)
}

/// Premultiply a straight-alpha `image` buffer into a [`Raster`].
pub fn raster_from_rgba(rgba: &image::RgbaImage) -> Raster {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.as_raw().clone();
    blend::premultiply_rgba8_in_place(&mut rgba8_premul);
    Raster {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

pub fn parse_svg(bytes: &[u8]) -> CardwrightResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(CardwrightError::from)
}

/// Rasterize an SVG tree into tightly packed premultiplied RGBA8.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> CardwrightResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardwrightError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}
