//! Text rasterization onto transparent canvases.

use ab_glyph::{Font, Glyph, OutlinedGlyph, Rect, ScaleFont, point};
use rand::RngCore;

use crate::assets::fonts::SizedFont;
use crate::corpus::{CharSpacing, SampledText};
use crate::foundation::core::{Canvas, Rgba8, transparent_canvas};
use crate::foundation::error::{SynthError, SynthResult};
use crate::render::composite::over;

/// Draw `sample` in `color` on a canvas sized to its ink.
///
/// Horizontal text without character spacing is drawn as one kerned run. Otherwise every
/// character is placed on its own, separated by `spacing * text height` pixels; vertical text is
/// stacked top-down and then rotated 90 degrees counter-clockwise.
pub fn draw_text(
    sample: &SampledText,
    color: Rgba8,
    spacing: Option<&CharSpacing>,
    rng: &mut dyn RngCore,
) -> SynthResult<Canvas> {
    if sample.text.is_empty() {
        return Err(SynthError::render("cannot draw empty text"));
    }
    let spacing = spacing.filter(|s| !s.is_disabled());
    match (spacing, sample.horizontal) {
        (None, true) => draw_run(&sample.font, &sample.text, color),
        (spacing, true) => draw_chars_horizontal(&sample.font, &sample.text, color, spacing, rng),
        (spacing, false) => {
            let canvas = draw_chars_vertical(&sample.font, &sample.text, color, spacing, rng)?;
            Ok(image::imageops::rotate270(&canvas))
        }
    }
}

fn draw_run(font: &SizedFont, text: &str, color: Rgba8) -> SynthResult<Canvas> {
    let scaled = font.scaled();
    let mut caret = 0.0f32;
    let mut prev = None;
    let mut outlined = Vec::new();
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph: Glyph = id.with_scale_and_position(font.scale, point(caret, 0.0));
        caret += scaled.h_advance(id);
        prev = Some(id);
        if let Some(og) = font.font.outline_glyph(glyph) {
            outlined.push(og);
        }
    }

    let bounds = union(outlined.iter().map(OutlinedGlyph::px_bounds))
        .ok_or_else(|| SynthError::render(format!("text '{text}' has no visible glyphs")))?;
    let mut canvas = transparent_canvas(bounds.width() as u32, bounds.height() as u32);
    let origin = (-bounds.min.x as i32, -bounds.min.y as i32);
    for og in &outlined {
        blit(&mut canvas, og, origin, color);
    }
    Ok(canvas)
}

/// One character outlined at the pen origin, baseline at `y = 0`.
struct CharGlyph {
    outlined: Option<OutlinedGlyph>,
    advance: f32,
}

impl CharGlyph {
    fn bounds(&self) -> Option<Rect> {
        self.outlined.as_ref().map(OutlinedGlyph::px_bounds)
    }
}

fn char_glyphs(font: &SizedFont, text: &str) -> Vec<CharGlyph> {
    let scaled = font.scaled();
    text.chars()
        .map(|c| {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(font.scale, point(0.0, 0.0));
            CharGlyph {
                outlined: font.font.outline_glyph(glyph),
                advance: scaled.h_advance(id),
            }
        })
        .collect()
}

fn char_spacings(
    spacing: Option<&CharSpacing>,
    count: usize,
    text_height: f32,
    rng: &mut dyn RngCore,
) -> Vec<i32> {
    (0..count)
        .map(|_| match spacing {
            Some(s) => (s.sample(&mut *rng) * f64::from(text_height)) as i32,
            None => 0,
        })
        .collect()
}

fn draw_chars_horizontal(
    font: &SizedFont,
    text: &str,
    color: Rgba8,
    spacing: Option<&CharSpacing>,
    rng: &mut dyn RngCore,
) -> SynthResult<Canvas> {
    let glyphs = char_glyphs(font, text);
    let extent = union(glyphs.iter().filter_map(CharGlyph::bounds))
        .ok_or_else(|| SynthError::render(format!("text '{text}' has no visible glyphs")))?;
    let widths: Vec<i32> = glyphs
        .iter()
        .map(|g| match g.bounds() {
            Some(b) => b.width() as i32,
            None => g.advance.round() as i32,
        })
        .collect();
    let spacings = char_spacings(spacing, glyphs.len(), extent.height(), rng);

    let gaps: i32 = spacings[..spacings.len() - 1].iter().sum();
    let width = widths.iter().sum::<i32>() + gaps;
    let mut canvas = transparent_canvas(width.max(1) as u32, extent.height() as u32);

    let top = extent.min.y as i32;
    let mut x = 0;
    for ((glyph, w), s) in glyphs.iter().zip(&widths).zip(&spacings) {
        if let (Some(og), Some(b)) = (&glyph.outlined, glyph.bounds()) {
            blit(&mut canvas, og, (x - b.min.x as i32, -top), color);
        }
        x += w + s;
    }
    Ok(canvas)
}

fn draw_chars_vertical(
    font: &SizedFont,
    text: &str,
    color: Rgba8,
    spacing: Option<&CharSpacing>,
    rng: &mut dyn RngCore,
) -> SynthResult<Canvas> {
    let glyphs = char_glyphs(font, text);
    let line_height = font.scaled().height().round() as i32;
    let heights: Vec<i32> = glyphs
        .iter()
        .map(|g| match g.bounds() {
            Some(b) => b.height() as i32,
            None => line_height,
        })
        .collect();
    let column = glyphs
        .iter()
        .filter_map(CharGlyph::bounds)
        .map(|b| b.width() as i32)
        .max()
        .ok_or_else(|| SynthError::render(format!("text '{text}' has no visible glyphs")))?;
    let spacings = char_spacings(spacing, glyphs.len(), column as f32, rng);

    let gaps: i32 = spacings[..spacings.len() - 1].iter().sum();
    let height = heights.iter().sum::<i32>() + gaps;
    let mut canvas = transparent_canvas(column as u32, height.max(1) as u32);

    let mut y = 0;
    for ((glyph, h), s) in glyphs.iter().zip(&heights).zip(&spacings) {
        if let (Some(og), Some(b)) = (&glyph.outlined, glyph.bounds()) {
            let left = (column - b.width() as i32) / 2;
            blit(&mut canvas, og, (left - b.min.x as i32, y - b.min.y as i32), color);
        }
        y += h + s;
    }
    Ok(canvas)
}

fn union(mut rects: impl Iterator<Item = Rect>) -> Option<Rect> {
    let first = rects.next()?;
    Some(rects.fold(first, |acc, r| Rect {
        min: point(acc.min.x.min(r.min.x), acc.min.y.min(r.min.y)),
        max: point(acc.max.x.max(r.max.x), acc.max.y.max(r.max.y)),
    }))
}

/// Blend `og` into `canvas`, shifted by `origin` from its own pixel bounds.
fn blit(canvas: &mut Canvas, og: &OutlinedGlyph, origin: (i32, i32), color: Rgba8) {
    let bounds = og.px_bounds();
    let x0 = bounds.min.x as i32 + origin.0;
    let y0 = bounds.min.y as i32 + origin.1;
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    og.draw(|gx, gy, coverage| {
        let (x, y) = (x0 + gx as i32, y0 + gy as i32);
        if x < 0 || y < 0 || x >= w || y >= h {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color[3])).round() as u8;
        if alpha == 0 {
            return;
        }
        let px = canvas.get_pixel_mut(x as u32, y as u32);
        px.0 = over(px.0, [color[0], color[1], color[2], alpha]);
    });
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
