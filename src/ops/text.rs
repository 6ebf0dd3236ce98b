//! Text stamping.
//!
//! Glyphs are laid out and rasterized with `ab_glyph`, then composited onto
//! the surface with the same source-over blend the shape tools use. The font
//! comes from the monospace face egui already embeds, so tests render
//! deterministically without touching the host's font directories.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use egui::Pos2;

use crate::canvas::Surface;

/// Load a rendering font from egui's bundled font data.
pub fn default_font() -> Option<FontArc> {
    let defs = egui::FontDefinitions::default();
    let data = defs
        .font_data
        .get("Hack")
        .or_else(|| defs.font_data.values().next())?;
    FontArc::try_from_vec(data.font.to_vec()).ok()
}

/// The canvas text size, derived from the brush-size slider.
pub fn text_px(brush_size: u32) -> f32 {
    (brush_size as f32 * 5.0).max(8.0)
}

/// Stamp a single line of text with its top-left corner at `origin`.
pub fn stamp_text(
    surface: &mut Surface,
    font: &FontArc,
    text: &str,
    size_px: f32,
    origin: Pos2,
    color: [u8; 3],
) {
    let scaled = font.as_scaled(PxScale::from(size_px));
    let baseline_y = origin.y + scaled.ascent();
    let mut pen_x = origin.x;
    let mut prev_glyph = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            pen_x += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(PxScale::from(size_px), ab_glyph::point(pen_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x + gx as f32;
                let y = bounds.min.y + gy as f32;
                if x < 0.0 || y < 0.0 {
                    return;
                }
                let (x, y) = (x as u32, y as u32);
                if let Some(mut pixel) = surface.get_pixel(x, y) {
                    blend_coverage(&mut pixel, color, coverage.clamp(0.0, 1.0));
                    surface.put_pixel(x, y, pixel);
                }
            });
        }
        pen_x += scaled.h_advance(id);
        prev_glyph = Some(id);
    }
}

#[inline]
fn blend_coverage(dst: &mut image::Rgba<u8>, src: [u8; 3], sa: f32) {
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let sc = src[c] as f32;
        let dc = dst[c] as f32;
        dst[c] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}
