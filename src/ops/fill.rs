//! Breadth-first flood fill over a flat RGBA buffer.

use std::collections::VecDeque;

/// 4-connected breadth-first fill.
///
/// The color at the seed pixel (full RGBA) is the match color; every pixel
/// reachable from the seed through pixels of exactly that color is overwritten
/// with `fill_rgb` at full opacity. Returns `true` when any pixel changed.
///
/// The no-op check compares only R, G, B of the seed against the fill color:
/// a seed that already matches the fill in RGB is treated as filled even when
/// it is partially transparent. Writes always land fully opaque, so filling
/// a translucent region with a *different* color still opacifies it.
///
/// The visited bitmap guarantees each coordinate is examined at most once,
/// bounding work to `width * height`. The caller is expected to hand in a
/// copy of the surface raster and commit the whole buffer back in one write
/// after this returns.
pub fn flood_fill(
    data: &mut [u8],
    width: u32,
    height: u32,
    start_x: u32,
    start_y: u32,
    fill_rgb: [u8; 3],
) -> bool {
    if width == 0 || height == 0 || start_x >= width || start_y >= height {
        return false;
    }
    debug_assert_eq!(data.len(), width as usize * height as usize * 4);

    let idx = |x: u32, y: u32| (y as usize * width as usize + x as usize) * 4;

    let start = idx(start_x, start_y);
    let match_color = [data[start], data[start + 1], data[start + 2], data[start + 3]];

    // Seed already carries the fill color in RGB: nothing to do. Alpha is
    // deliberately ignored on the seed side of this comparison.
    if match_color[..3] == fill_rgb {
        return false;
    }

    let mut visited = vec![false; width as usize * height as usize];
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
    queue.push_back((start_x, start_y));
    let mut changed = false;

    while let Some((x, y)) = queue.pop_front() {
        if x >= width || y >= height {
            continue;
        }
        let flat = y as usize * width as usize + x as usize;
        if visited[flat] {
            continue;
        }
        visited[flat] = true;

        let i = idx(x, y);
        let current = [data[i], data[i + 1], data[i + 2], data[i + 3]];
        if current != match_color {
            continue;
        }

        data[i] = fill_rgb[0];
        data[i + 1] = fill_rgb[1];
        data[i + 2] = fill_rgb[2];
        data[i + 3] = 255;
        changed = true;

        if x + 1 < width {
            queue.push_back((x + 1, y));
        }
        if x > 0 {
            queue.push_back((x - 1, y));
        }
        if y + 1 < height {
            queue.push_back((x, y + 1));
        }
        if y > 0 {
            queue.push_back((x, y - 1));
        }
    }

    changed
}
