use std::path::Path;

use crate::{
    assets,
    canvas::Canvas,
    error::{CardwrightError, CardwrightResult},
};

/// Measured bounds of a single-run text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// One deferred text paint: `text` at `size_px` with its layout's top-left
/// corner at `(x, y)` in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPaint {
    pub text: String,
    pub size_px: f32,
    pub x: f32,
    pub y: f32,
    /// Straight-alpha RGBA fill color.
    pub color_rgba8: [u8; 4],
}

/// Text measurement and painting seam.
///
/// The compositor and the fitter only talk to this trait; production uses the
/// parley/vello-backed [`TypeSetter`], tests substitute a fixed-advance
/// engine. Implementations must be deterministic for fixed inputs.
pub trait TextEngine {
    fn measure(&mut self, text: &str, size_px: f32) -> CardwrightResult<TextExtent>;

    /// Rasterize a batch of paints onto `canvas` in one pass.
    fn paint(&mut self, canvas: &mut Canvas, paints: &[TextPaint]) -> CardwrightResult<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
struct BrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Parley-shaped, `vello_cpu`-rasterized text engine over one font.
///
/// The font registers with Parley once at construction; layouts are
/// single-run and unconstrained (wrapping is the fitter's job, not the
/// shaper's). Holds mutable shaping contexts, so parallel card renders give
/// each worker its own instance.
pub struct TypeSetter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<BrushRgba8>,
    family: String,
    font: vello_cpu::peniko::FontData,
    ctx: Option<vello_cpu::RenderContext>,
}

impl TypeSetter {
    /// Build an engine from raw font bytes.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> CardwrightResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CardwrightError::validation("no font families registered from font bytes")
        })?;

        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardwrightError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
            ctx: None,
        })
    }

    pub fn from_font_file(path: &Path) -> CardwrightResult<Self> {
        Self::from_font_bytes(assets::read_bytes(path)?)
    }

    /// Primary family name resolved from the font data.
    pub fn family(&self) -> &str {
        &self.family
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: BrushRgba8,
    ) -> CardwrightResult<parley::Layout<BrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardwrightError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<BrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CardwrightResult<R>,
    ) -> CardwrightResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl TextEngine for TypeSetter {
    fn measure(&mut self, text: &str, size_px: f32) -> CardwrightResult<TextExtent> {
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        let layout = self.layout(text, size_px, BrushRgba8::default())?;
        Ok(TextExtent {
            width: layout.width(),
            height: layout.height(),
        })
    }

    fn paint(&mut self, canvas: &mut Canvas, paints: &[TextPaint]) -> CardwrightResult<()> {
        if paints.is_empty() {
            return Ok(());
        }

        let width: u16 = canvas
            .width()
            .try_into()
            .map_err(|_| CardwrightError::render("canvas width exceeds text raster limit"))?;
        let height: u16 = canvas
            .height()
            .try_into()
            .map_err(|_| CardwrightError::render("canvas height exceeds text raster limit"))?;

        let pixmap = self.with_ctx_mut(width, height, |this, ctx| {
            for paint in paints {
                if paint.text.is_empty() {
                    continue;
                }
                let [r, g, b, a] = paint.color_rgba8;
                let layout = this.layout(&paint.text, paint.size_px, BrushRgba8 { r, g, b, a })?;

                ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                    f64::from(paint.x),
                    f64::from(paint.y),
                )));
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&this.font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }

            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;

        canvas.composite_over(pixmap.data_as_u8_slice())
    }
}
