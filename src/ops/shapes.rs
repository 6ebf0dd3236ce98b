//! Shape and stroke rasterization.
//!
//! Every primitive is rendered the same way: a signed-distance function is
//! evaluated per pixel over the shape's bounding box, converted to coverage
//! with a half-pixel smoothstep, and composited source-over onto the surface
//! (the eraser uses destination-out instead, producing true transparency).
//!
//! Preview contract: these calls render the *final* image for the current
//! pointer position. During a drag the caller restores the pristine pre-drag
//! snapshot before each call, so repeated calls never compound.

use egui::Pos2;
use rayon::prelude::*;

use crate::canvas::Surface;

/// Dash period used by selection rectangles and polygon closing hints,
/// in pixels (5 on, 5 off).
pub const DASH_LEN: f32 = 5.0;

/// Selection marquee color.
pub const MARQUEE_COLOR: [u8; 3] = [0x00, 0xFF, 0x00];

// ---- SDF helpers -----------------------------------------------------------

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Half-pixel anti-aliased coverage from a signed distance.
#[inline]
fn aa(d: f32) -> f32 {
    smoothstep(0.5, -0.5, d)
}

/// Distance from (px, py) to the segment a→b, and the projection parameter
/// along the segment in pixels (for dashing).
#[inline]
fn segment_distance(px: f32, py: f32, a: Pos2, b: Pos2) -> (f32, f32) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-12 {
        let d = ((px - a.x).powi(2) + (py - a.y).powi(2)).sqrt();
        return (d, 0.0);
    }
    let t = (((px - a.x) * dx + (py - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
    (d, t * len_sq.sqrt())
}

/// SDF for a box centred at origin with half-extents (hx, hy).
#[inline]
fn sdf_box(px: f32, py: f32, hx: f32, hy: f32) -> f32 {
    let dx = px.abs() - hx;
    let dy = py.abs() - hy;
    let outside = (dx.max(0.0).powi(2) + dy.max(0.0).powi(2)).sqrt();
    let inside = dx.max(dy).min(0.0);
    outside + inside
}

/// SDF for a box with rounded corners.
#[inline]
fn sdf_rounded_box(px: f32, py: f32, hx: f32, hy: f32, r: f32) -> f32 {
    let r = r.min(hx).min(hy).max(0.0);
    sdf_box(px, py, hx - r, hy - r) - r
}

/// Approximate SDF for an axis-aligned ellipse with radii (rx, ry).
#[inline]
fn sdf_ellipse(px: f32, py: f32, rx: f32, ry: f32) -> f32 {
    let rx = rx.max(0.25);
    let ry = ry.max(0.25);
    let nx = px / rx;
    let ny = py / ry;
    let len = (nx * nx + ny * ny).sqrt();
    if len < 1e-8 {
        return -rx.min(ry);
    }
    let scale = (rx * rx * ny * ny + ry * ry * nx * nx).sqrt() / (rx * ry * len);
    (len - 1.0) / scale
}

/// Signed distance to a simple polygon (negative inside).
fn sdf_polygon(verts: &[Pos2], px: f32, py: f32) -> f32 {
    let n = verts.len();
    let mut d = (px - verts[0].x).powi(2) + (py - verts[0].y).powi(2);
    let mut s = 1.0f32;
    let mut j = n - 1;
    for i in 0..n {
        let ex = verts[j].x - verts[i].x;
        let ey = verts[j].y - verts[i].y;
        let wx = px - verts[i].x;
        let wy = py - verts[i].y;
        let t = ((wx * ex + wy * ey) / (ex * ex + ey * ey).max(1e-12)).clamp(0.0, 1.0);
        let bx = wx - ex * t;
        let by = wy - ey * t;
        d = d.min(bx * bx + by * by);
        let c1 = py >= verts[i].y;
        let c2 = py < verts[j].y;
        let c3 = ex * wy > ey * wx;
        if (c1 && c2 && c3) || (!c1 && !c2 && !c3) {
            s = -s;
        }
        j = i;
    }
    s * d.sqrt()
}

// ---- Compositing -----------------------------------------------------------

/// Source-over blend of one RGBA value onto a destination pixel.
#[inline]
fn blend_over(dst: &mut image::Rgba<u8>, src: [u8; 3], src_alpha: f32) {
    if src_alpha <= 0.0 {
        return;
    }
    if src_alpha >= 1.0 {
        *dst = image::Rgba([src[0], src[1], src[2], 255]);
        return;
    }
    let sa = src_alpha;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = image::Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let sc = src[c] as f32;
        let dc = dst[c] as f32;
        dst[c] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Rasterize a coverage function over a bounding box into a scratch RGBA
/// buffer (rows in parallel), then composite it over the surface.
fn render_coverage<F>(surface: &mut Surface, min: Pos2, max: Pos2, color: [u8; 3], coverage: F)
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    let x0 = (min.x.floor() as i32).max(0);
    let y0 = (min.y.floor() as i32).max(0);
    let x1 = (max.x.ceil() as i32).min(surface.width() as i32);
    let y1 = (max.y.ceil() as i32).min(surface.height() as i32);
    let buf_w = (x1 - x0).max(0) as usize;
    let buf_h = (y1 - y0).max(0) as usize;
    if buf_w == 0 || buf_h == 0 {
        return;
    }

    let mut cov = vec![0.0f32; buf_w * buf_h];
    cov.par_chunks_mut(buf_w).enumerate().for_each(|(row, row_buf)| {
        let py = (y0 + row as i32) as f32 + 0.5;
        for (col, out) in row_buf.iter_mut().enumerate() {
            let px = (x0 + col as i32) as f32 + 0.5;
            *out = coverage(px, py).clamp(0.0, 1.0);
        }
    });

    for row in 0..buf_h {
        for col in 0..buf_w {
            let c = cov[row * buf_w + col];
            if c > 0.001 {
                let x = (x0 + col as i32) as u32;
                let y = (y0 + row as i32) as u32;
                if let Some(mut pixel) = surface.get_pixel(x, y) {
                    blend_over(&mut pixel, color, c);
                    surface.put_pixel(x, y, pixel);
                }
            }
        }
    }
}

// ---- Strokes ---------------------------------------------------------------

#[inline]
fn segment_bounds(a: Pos2, b: Pos2, pad: f32) -> (Pos2, Pos2) {
    (
        Pos2::new(a.x.min(b.x) - pad, a.y.min(b.y) - pad),
        Pos2::new(a.x.max(b.x) + pad, a.y.max(b.y) + pad),
    )
}

/// Stroke one segment with round caps. A zero-length segment paints a dab.
pub fn stroke_segment(surface: &mut Surface, a: Pos2, b: Pos2, width: f32, color: [u8; 3]) {
    let half = (width * 0.5).max(0.5);
    let (min, max) = segment_bounds(a, b, half + 1.0);
    render_coverage(surface, min, max, color, |px, py| {
        let (d, _) = segment_distance(px, py, a, b);
        aa(d - half)
    });
}

/// Erase along a segment: destination-out, scaling existing alpha by the
/// inverse coverage. Color channels are left in place.
pub fn erase_segment(surface: &mut Surface, a: Pos2, b: Pos2, width: f32) {
    let half = (width * 0.5).max(0.5);
    let (min, max) = segment_bounds(a, b, half + 1.0);
    let x0 = (min.x.floor() as i32).max(0);
    let y0 = (min.y.floor() as i32).max(0);
    let x1 = (max.x.ceil() as i32).min(surface.width() as i32);
    let y1 = (max.y.ceil() as i32).min(surface.height() as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            let (d, _) = segment_distance(x as f32 + 0.5, y as f32 + 0.5, a, b);
            let c = aa(d - half);
            if c > 0.001 {
                if let Some(mut pixel) = surface.get_pixel(x as u32, y as u32) {
                    let da = pixel[3] as f32 / 255.0;
                    pixel[3] = (da * (1.0 - c) * 255.0).round() as u8;
                    surface.put_pixel(x as u32, y as u32, pixel);
                }
            }
        }
    }
}

/// Stroke a dashed segment (5 px on, 5 px off).
pub fn stroke_dashed_segment(surface: &mut Surface, a: Pos2, b: Pos2, width: f32, color: [u8; 3]) {
    let half = (width * 0.5).max(0.5);
    let (min, max) = segment_bounds(a, b, half + 1.0);
    render_coverage(surface, min, max, color, |px, py| {
        let (d, t) = segment_distance(px, py, a, b);
        if ((t / DASH_LEN).floor() as i64) % 2 != 0 {
            return 0.0;
        }
        aa(d - half)
    });
}

/// Stroke an open polyline; `close` joins the last point back to the first.
pub fn stroke_polyline(surface: &mut Surface, points: &[Pos2], width: f32, color: [u8; 3], close: bool) {
    for pair in points.windows(2) {
        stroke_segment(surface, pair[0], pair[1], width, color);
    }
    if close && points.len() > 2 {
        stroke_segment(surface, points[points.len() - 1], points[0], width, color);
    }
}

// ---- Outlined shapes -------------------------------------------------------

/// Rectangle outline between two opposite drag corners.
pub fn stroke_rect(surface: &mut Surface, a: Pos2, b: Pos2, width: f32, color: [u8; 3]) {
    let half = (width * 0.5).max(0.5);
    let cx = (a.x + b.x) * 0.5;
    let cy = (a.y + b.y) * 0.5;
    let hx = (b.x - a.x).abs() * 0.5;
    let hy = (b.y - a.y).abs() * 0.5;
    let (min, max) = segment_bounds(a, b, half + 1.0);
    render_coverage(surface, min, max, color, |px, py| {
        let d = sdf_box(px - cx, py - cy, hx, hy);
        aa(d.abs() - half)
    });
}

/// Ellipse outline inscribed in the drag bounding box.
pub fn stroke_ellipse(surface: &mut Surface, a: Pos2, b: Pos2, width: f32, color: [u8; 3]) {
    let half = (width * 0.5).max(0.5);
    let cx = (a.x + b.x) * 0.5;
    let cy = (a.y + b.y) * 0.5;
    let rx = (b.x - a.x).abs() * 0.5;
    let ry = (b.y - a.y).abs() * 0.5;
    let (min, max) = segment_bounds(a, b, half + 1.0);
    render_coverage(surface, min, max, color, |px, py| {
        let d = sdf_ellipse(px - cx, py - cy, rx, ry);
        aa(d.abs() - half)
    });
}

/// Rounded-rectangle outline; corner radius is 20% of the shorter side.
pub fn stroke_rounded_rect(surface: &mut Surface, a: Pos2, b: Pos2, width: f32, color: [u8; 3]) {
    let half = (width * 0.5).max(0.5);
    let w = (b.x - a.x).abs();
    let h = (b.y - a.y).abs();
    let radius = w.min(h) * 0.2;
    let cx = (a.x + b.x) * 0.5;
    let cy = (a.y + b.y) * 0.5;
    let (min, max) = segment_bounds(a, b, half + 1.0);
    render_coverage(surface, min, max, color, |px, py| {
        let d = sdf_rounded_box(px - cx, py - cy, w * 0.5, h * 0.5, radius);
        aa(d.abs() - half)
    });
}

/// Dashed 1 px selection marquee between two drag corners.
pub fn stroke_marquee(surface: &mut Surface, a: Pos2, b: Pos2) {
    let min = Pos2::new(a.x.min(b.x), a.y.min(b.y));
    let max = Pos2::new(a.x.max(b.x), a.y.max(b.y));
    let corners = [
        min,
        Pos2::new(max.x, min.y),
        max,
        Pos2::new(min.x, max.y),
    ];
    for i in 0..4 {
        stroke_dashed_segment(surface, corners[i], corners[(i + 1) % 4], 1.0, MARQUEE_COLOR);
    }
}

/// Filled and stroked triangle (the polygon tool's committed form).
pub fn fill_stroke_triangle(surface: &mut Surface, verts: [Pos2; 3], width: f32, color: [u8; 3]) {
    let half = (width * 0.5).max(0.5);
    let min = Pos2::new(
        verts.iter().map(|p| p.x).fold(f32::MAX, f32::min) - half - 1.0,
        verts.iter().map(|p| p.y).fold(f32::MAX, f32::min) - half - 1.0,
    );
    let max = Pos2::new(
        verts.iter().map(|p| p.x).fold(f32::MIN, f32::max) + half + 1.0,
        verts.iter().map(|p| p.y).fold(f32::MIN, f32::max) + half + 1.0,
    );
    render_coverage(surface, min, max, color, |px, py| {
        // Same ink for fill and outline, so fill-plus-stroke collapses to
        // filling the shape dilated by the half stroke width.
        let d = sdf_polygon(&verts, px, py);
        aa(d - half)
    });
}

// ---- Composite previews ----------------------------------------------------

/// Open polygon outline. With exactly two vertices placed, a dashed hint
/// shows where the auto-closing third vertex of the equilateral triangle
/// would land.
pub fn polygon_preview(surface: &mut Surface, points: &[Pos2], width: f32, color: [u8; 3]) {
    if points.len() < 2 {
        return;
    }
    stroke_polyline(surface, points, width, color, false);
    if points.len() == 2 {
        let third = equilateral_third(points[0], points[1]);
        stroke_dashed_segment(surface, points[1], third, width, color);
        stroke_dashed_segment(surface, third, points[0], width, color);
    }
}

/// Third vertex of the equilateral triangle built on edge a→b.
pub fn equilateral_third(a: Pos2, b: Pos2) -> Pos2 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx) + std::f32::consts::FRAC_PI_3;
    Pos2::new(a.x + len * angle.cos(), a.y + len * angle.sin())
}

/// Smoothed multi-point curve: quadratic segments whose control point is the
/// midpoint of each consecutive pair, flattened and stroked.
pub fn stroke_curve(surface: &mut Surface, points: &[Pos2], width: f32, color: [u8; 3]) {
    if points.len() < 2 {
        return;
    }
    const STEPS: u32 = 12;
    let mut path: Vec<Pos2> = Vec::with_capacity(points.len() * STEPS as usize);
    let mut pen = points[0];
    path.push(pen);
    for i in 1..points.len() {
        let end = points[i];
        let control = Pos2::new((points[i - 1].x + end.x) * 0.5, (points[i - 1].y + end.y) * 0.5);
        for step in 1..=STEPS {
            let t = step as f32 / STEPS as f32;
            let mt = 1.0 - t;
            path.push(Pos2::new(
                mt * mt * pen.x + 2.0 * mt * t * control.x + t * t * end.x,
                mt * mt * pen.y + 2.0 * mt * t * control.y + t * t * end.y,
            ));
        }
        pen = end;
    }
    stroke_polyline(surface, &path, width, color, false);
}
