use crate::{
    error::{CardwrightError, CardwrightResult},
    typeset::TextEngine,
};

/// Fixed font-size decrement used by the shrink loop.
pub const FONT_STEP: f32 = 2.0;

/// Box and font bounds for one fitting run.
#[derive(Clone, Copy, Debug)]
pub struct FitParams {
    pub max_width: f32,
    pub max_height: f32,
    pub start_size: f32,
    pub min_size: f32,
    /// Extra pixels added below each line when stacking the block.
    pub line_spacing: f32,
}

/// One wrapped line with its measured width at the chosen font size.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedLine {
    pub text: String,
    pub width: f32,
}

/// Greedy word-wrap with iterative shrink-to-fit.
///
/// Words accumulate into a line while the measured candidate still fits
/// `max_width`; embedded `\n` are hard breaks that reset the accumulator.
/// When the stacked block (`lines * (size + line_spacing)`) overflows
/// `max_height` the font size drops by [`FONT_STEP`] and wrapping restarts,
/// down to `min_size`, where the overflowing layout is accepted as-is.
///
/// A single word wider than `max_width` is emitted alone, unsplit. Empty
/// input yields zero lines. For fixed inputs and a deterministic engine the
/// result is identical on every call.
pub fn fit(
    engine: &mut dyn TextEngine,
    text: &str,
    params: FitParams,
) -> CardwrightResult<(f32, Vec<RenderedLine>)> {
    if !params.start_size.is_finite() || !params.min_size.is_finite() {
        return Err(CardwrightError::validation("font sizes must be finite"));
    }
    if params.min_size <= 0.0 || params.start_size < params.min_size {
        return Err(CardwrightError::validation(
            "font sizes must satisfy 0 < min_size <= start_size",
        ));
    }
    if params.max_width <= 0.0 {
        return Err(CardwrightError::validation("max_width must be > 0"));
    }

    if text.is_empty() {
        return Ok((params.start_size, Vec::new()));
    }

    let mut size = params.start_size;
    loop {
        let lines = wrap(engine, text, params.max_width, size)?;
        let block_height = lines.len() as f32 * (size + params.line_spacing);
        if block_height <= params.max_height || size <= params.min_size {
            return Ok((size, lines));
        }
        size = (size - FONT_STEP).max(params.min_size);
    }
}

fn wrap(
    engine: &mut dyn TextEngine,
    text: &str,
    max_width: f32,
    size: f32,
) -> CardwrightResult<Vec<RenderedLine>> {
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let mut current = String::new();
        for word in segment.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if engine.measure(&candidate, size)?.width <= max_width {
                current = candidate;
            } else {
                if !current.is_empty() {
                    let width = engine.measure(&current, size)?.width;
                    lines.push(RenderedLine {
                        text: current,
                        width,
                    });
                }
                current = word.to_string();
            }
        }

        // Close the segment; an empty segment stays as an empty line so
        // paragraph spacing survives hard breaks.
        let width = if current.is_empty() {
            0.0
        } else {
            engine.measure(&current, size)?.width
        };
        lines.push(RenderedLine {
            text: current,
            width,
        });
    }

    Ok(lines)
}
