use std::path::Path;

use anyhow::Context;

use crate::{
    assets::Raster,
    blend,
    error::{CardwrightError, CardwrightResult},
};

/// Output raster for one card render.
///
/// Owns a premultiplied RGBA8 buffer that starts fully transparent and is
/// mutated only through paint operations; one canvas belongs to exactly one
/// render call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> CardwrightResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardwrightError::validation(
                "canvas width/height must be > 0",
            ));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| CardwrightError::validation("canvas dimensions overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes in row-major premultiplied RGBA8.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> blend::PremulRgba8 {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Source-over `src` with its top-left corner at `(x, y)`, clipped to the
    /// canvas bounds.
    pub fn blit(&mut self, src: &Raster, x: i64, y: i64) {
        let cw = self.width as i64;
        let ch = self.height as i64;
        let sw = src.width as i64;
        let sh = src.height as i64;

        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + sw).min(cw);
        let y1 = (y + sh).min(ch);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            for dx in x0..x1 {
                let sx = (dx - x) as usize;
                let si = (sy * src.width as usize + sx) * 4;
                let di = ((dy as usize) * (self.width as usize) + dx as usize) * 4;
                let s = &src.rgba8_premul[si..si + 4];
                let d = &mut self.data[di..di + 4];
                let out = blend::over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Source-over a canvas-sized premul RGBA8 buffer (e.g. a rendered text
    /// pass) onto the whole canvas.
    pub fn composite_over(&mut self, src: &[u8]) -> CardwrightResult<()> {
        blend::over_in_place(&mut self.data, src)
    }

    /// Encode as PNG with straight (unpremultiplied) alpha.
    pub fn encode_png(&self) -> CardwrightResult<Vec<u8>> {
        let mut straight = self.data.clone();
        blend::unpremultiply_rgba8_in_place(&mut straight);
        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| CardwrightError::render("canvas buffer size mismatch"))?;

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode canvas as png")?;
        Ok(buf)
    }

    /// Encode and write the finished canvas in one step.
    ///
    /// Encoding happens fully in memory before the file is touched, so a
    /// failed render never leaves a partial output file behind. The parent
    /// directory must already exist.
    pub fn write_png(&self, path: &Path) -> CardwrightResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("write card png to '{}'", path.display()))
            .map_err(CardwrightError::from)
    }
}
