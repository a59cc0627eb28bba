use crate::{
    assets,
    canvas::Canvas,
    error::CardwrightResult,
    frames::FrameSelector,
    inline::{self, InlineElement},
    layout::{
        ABILITY_FONT_MIN, ABILITY_FONT_START, ABILITY_LINE_SPACING, ABILITY_PAD_TOP, CANVAS_HEIGHT,
        CANVAS_WIDTH, COST_GLYPH_SIZE, CardLayout, FLAVOR_FONT, POWER_TOUGHNESS_FONT,
        TITLE_FONT_MAX, TYPE_LINE_FONT,
    },
    model::CardSpec,
    symbols::SymbolResolver,
    textfit::{self, FitParams},
    typeset::{TextEngine, TextPaint},
};

/// Fill color for all card text.
pub const TEXT_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Paints one card onto a fresh canvas in a fixed layering order: frame,
/// cover-cropped art, title (name + right-aligned mana cost), type line,
/// fitted ability block, then the optional power/toughness and flavor boxes.
///
/// Geometry is static per card type; skipping an absent optional input never
/// moves a later step. Symbol rasters blit directly, text paints are deferred
/// into one batch so the engine rasterizes a single glyph pass on top.
pub struct Compositor<'a> {
    frames: &'a FrameSelector,
    symbols: &'a SymbolResolver,
    text: &'a mut dyn TextEngine,
}

impl<'a> Compositor<'a> {
    pub fn new(
        frames: &'a FrameSelector,
        symbols: &'a SymbolResolver,
        text: &'a mut dyn TextEngine,
    ) -> Self {
        Self {
            frames,
            symbols,
            text,
        }
    }

    /// Render `spec` (plus optional pre-fetched art) into a finished canvas.
    ///
    /// Validation runs before any painting; a failed step aborts the card
    /// without producing output. Absent art simply leaves the frame's art
    /// window untouched.
    #[tracing::instrument(skip_all, fields(card = %spec.name))]
    pub fn render(
        &mut self,
        spec: &CardSpec,
        art: Option<&image::RgbaImage>,
    ) -> CardwrightResult<Canvas> {
        spec.validate()?;
        let card_type = spec.card_type()?;
        let layout = card_type.layout();

        let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;
        let mut texts: Vec<TextPaint> = Vec::new();

        let frame = assets::load_image(&self.frames.select(card_type, spec.color)?)?;
        canvas.blit(&frame, 0, 0);

        if let Some(art) = art {
            let cropped = cover_crop(art, layout.art.width(), layout.art.height());
            canvas.blit(
                &assets::raster_from_rgba(&cropped),
                i64::from(layout.art.x0),
                i64::from(layout.art.y0),
            );
        } else {
            tracing::debug!("no art raster, keeping frame art window");
        }

        self.queue_title(&mut canvas, spec, layout, &mut texts)?;
        queue_type_line(spec, layout, &mut texts);
        self.queue_abilities(spec, layout, &mut texts)?;
        self.queue_power_toughness(spec, layout, &mut texts)?;
        self.queue_flavor(spec, layout, &mut texts)?;

        self.text.paint(&mut canvas, &texts)?;
        Ok(canvas)
    }

    /// Name left-aligned at the title box's vertical center; mana cost
    /// right-aligned against the box edge, advancing glyph squares and
    /// measured text runs left to right.
    fn queue_title(
        &mut self,
        canvas: &mut Canvas,
        spec: &CardSpec,
        layout: &CardLayout,
        texts: &mut Vec<TextPaint>,
    ) -> CardwrightResult<()> {
        let title = layout.title;
        let size = title_font_size(&spec.name, &spec.mana_cost, title.width());

        let name_extent = self.text.measure(&spec.name, size)?;
        let name_y = title.y0 as f32 + (title.height() as f32 - name_extent.height) / 2.0;
        texts.push(TextPaint {
            text: spec.name.clone(),
            size_px: size,
            x: title.x0 as f32,
            y: name_y,
            color_rgba8: TEXT_COLOR,
        });

        let elements = inline::scan(&spec.mana_cost, self.symbols)?;
        if elements.is_empty() {
            return Ok(());
        }

        let glyph_size = COST_GLYPH_SIZE as f32;
        let mut advances = Vec::with_capacity(elements.len());
        for element in &elements {
            let advance = match element {
                InlineElement::Symbol(_) => glyph_size,
                InlineElement::Text(s) => self.text.measure(s, glyph_size)?.width,
            };
            advances.push(advance);
        }

        let total: f32 = advances.iter().sum();
        let mut x = title.x1 as f32 - total;
        for (element, advance) in elements.iter().zip(advances) {
            match element {
                InlineElement::Symbol(id) => match self.symbols.resolve(id)? {
                    Some(glyph) => {
                        let raster = glyph.resized(COST_GLYPH_SIZE)?;
                        canvas.blit(&raster, x.round() as i64, name_y.round() as i64);
                    }
                    None => texts.push(TextPaint {
                        text: format!("{{{id}}}"),
                        size_px: glyph_size,
                        x,
                        y: name_y,
                        color_rgba8: TEXT_COLOR,
                    }),
                },
                InlineElement::Text(s) => texts.push(TextPaint {
                    text: s.clone(),
                    size_px: glyph_size,
                    x,
                    y: name_y,
                    color_rgba8: TEXT_COLOR,
                }),
            }
            x += advance;
        }

        Ok(())
    }

    fn queue_abilities(
        &mut self,
        spec: &CardSpec,
        layout: &CardLayout,
        texts: &mut Vec<TextPaint>,
    ) -> CardwrightResult<()> {
        let joined = spec.abilities.join("\n");
        if joined.is_empty() {
            return Ok(());
        }

        let bx = layout.abilities;
        let (size, lines) = textfit::fit(
            &mut *self.text,
            &joined,
            FitParams {
                max_width: bx.width() as f32,
                max_height: bx.height() as f32,
                start_size: ABILITY_FONT_START,
                min_size: ABILITY_FONT_MIN,
                line_spacing: ABILITY_LINE_SPACING,
            },
        )?;
        tracing::debug!(size = f64::from(size), lines = lines.len(), "fitted ability block");

        let mut y = bx.y0 as f32 + ABILITY_PAD_TOP;
        for line in lines {
            if !line.text.is_empty() {
                texts.push(TextPaint {
                    text: line.text,
                    size_px: size,
                    x: bx.x0 as f32,
                    y,
                    color_rgba8: TEXT_COLOR,
                });
            }
            y += size + ABILITY_LINE_SPACING;
        }
        Ok(())
    }

    fn queue_power_toughness(
        &mut self,
        spec: &CardSpec,
        layout: &CardLayout,
        texts: &mut Vec<TextPaint>,
    ) -> CardwrightResult<()> {
        let (Some(pt), Some(bx)) = (spec.power_toughness.as_deref(), layout.power_toughness)
        else {
            return Ok(());
        };
        let pt = pt.trim();
        if pt.is_empty() {
            return Ok(());
        }

        let extent = self.text.measure(pt, POWER_TOUGHNESS_FONT)?;
        texts.push(TextPaint {
            text: pt.to_string(),
            size_px: POWER_TOUGHNESS_FONT,
            x: bx.x0 as f32 + (bx.width() as f32 - extent.width) / 2.0,
            y: bx.y0 as f32 + (bx.height() as f32 - extent.height) / 2.0,
            color_rgba8: TEXT_COLOR,
        });
        Ok(())
    }

    fn queue_flavor(
        &mut self,
        spec: &CardSpec,
        layout: &CardLayout,
        texts: &mut Vec<TextPaint>,
    ) -> CardwrightResult<()> {
        let (Some(flavor), Some(bx)) = (spec.flavor_text.as_deref(), layout.flavor) else {
            return Ok(());
        };
        let flavor = flavor.trim();
        if flavor.is_empty() {
            return Ok(());
        }

        let extent = self.text.measure(flavor, FLAVOR_FONT)?;
        texts.push(TextPaint {
            text: flavor.to_string(),
            size_px: FLAVOR_FONT,
            x: bx.x0 as f32 + (bx.width() as f32 - extent.width) / 2.0,
            y: bx.y0 as f32 + (bx.height() as f32 - extent.height) / 2.0,
            color_rgba8: TEXT_COLOR,
        });
        Ok(())
    }
}

fn queue_type_line(spec: &CardSpec, layout: &CardLayout, texts: &mut Vec<TextPaint>) {
    let (x, y) = layout.type_line;
    texts.push(TextPaint {
        text: spec.type_line.clone(),
        size_px: TYPE_LINE_FONT,
        x: x as f32,
        y: y as f32,
        color_rgba8: TEXT_COLOR,
    });
}

/// Starting title size from the original length heuristic, capped at
/// [`TITLE_FONT_MAX`]: long names and costs share the box, so the size scales
/// with the combined character weight.
pub fn title_font_size(name: &str, mana_cost: &str, box_width: u32) -> f32 {
    let weight = name.chars().count() as f32 + mana_cost.chars().count() as f32 / 2.0;
    if weight <= 0.0 {
        return TITLE_FONT_MAX;
    }
    (box_width as f32 / weight).min(TITLE_FONT_MAX)
}

/// Scale `art` preserving aspect ratio until it fully covers `width` ×
/// `height`, then center-crop the overflow.
pub fn cover_crop(art: &image::RgbaImage, width: u32, height: u32) -> image::RgbaImage {
    let (sw, sh) = art.dimensions();
    if sw == 0 || sh == 0 {
        return image::RgbaImage::new(width, height);
    }

    let scale = (width as f64 / sw as f64).max(height as f64 / sh as f64);
    let rw = ((sw as f64 * scale).round() as u32).max(width);
    let rh = ((sh as f64 * scale).round() as u32).max(height);

    let resized = if (rw, rh) == (sw, sh) {
        art.clone()
    } else {
        image::imageops::resize(art, rw, rh, image::imageops::FilterType::Lanczos3)
    };

    let x_off = (rw - width) / 2;
    let y_off = (rh - height) / 2;
    image::imageops::crop_imm(&resized, x_off, y_off, width, height).to_image()
}

/// Sanitized `<name>_<type>.png` output file name: every non-alphanumeric
/// character becomes an underscore.
pub fn output_file_name(spec: &CardSpec) -> CardwrightResult<String> {
    let card_type = spec.card_type()?;
    let stem: String = format!("{}_{}", spec.name, card_type)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    Ok(format!("{stem}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorCategory;

    fn spec() -> CardSpec {
        CardSpec {
            name: "Test Card".to_string(),
            mana_cost: "{2}{G}".to_string(),
            type_line: "Creature".to_string(),
            abilities: vec!["Trample".to_string()],
            power_toughness: None,
            flavor_text: None,
            rarity: "common".to_string(),
            color: ColorCategory::Green,
        }
    }

    #[test]
    fn output_file_name_replaces_non_alphanumerics() {
        let mut s = spec();
        s.name = "Jace's Mind-Spike!".to_string();
        assert_eq!(
            output_file_name(&s).unwrap(),
            "Jace_s_Mind_Spike__Creature.png"
        );
    }

    #[test]
    fn output_file_name_requires_known_type() {
        let mut s = spec();
        s.type_line = "Contraption".to_string();
        assert!(output_file_name(&s).is_err());
    }

    #[test]
    fn title_font_size_matches_length_heuristic() {
        // 1272 / (4 + 6/2) capped at 90.
        assert_eq!(title_font_size("Test", "{2}{G}", 1272), 90.0);
        // 40-char name: 1272 / (40 + 3) ~ 29.58.
        let name = "a".repeat(40);
        let got = title_font_size(&name, "{G}", 1272);
        assert!((got - 1272.0 / 43.0).abs() < 1e-4);
    }

    #[test]
    fn cover_crop_wide_source_crops_columns() {
        // 4x2 source into 2x2: no resize (scale = 1), crop one column each side.
        let mut src = image::RgbaImage::new(4, 2);
        for (x, _, px) in src.enumerate_pixels_mut() {
            *px = image::Rgba([x as u8 * 10, 0, 0, 255]);
        }
        let out = cover_crop(&src, 2, 2);
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(0, 0).0, [10, 0, 0, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [20, 0, 0, 255]);
    }

    #[test]
    fn cover_crop_always_fills_the_target() {
        for (sw, sh) in [(1, 1), (3, 5), (500, 20), (20, 500)] {
            let src = image::RgbaImage::from_pixel(sw, sh, image::Rgba([7, 7, 7, 255]));
            let out = cover_crop(&src, 120, 80);
            assert_eq!(out.dimensions(), (120, 80));
        }
    }
}
