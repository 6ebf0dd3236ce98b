//! The drawing surface: a single mutable RGBA raster that *is* the document.
//!
//! All tools mutate the surface in place. Shape previews restore a pristine
//! [`Snapshot`] before every redraw so repeated preview calls never compound,
//! and the history manager stores full-surface snapshots by value — restores
//! are synchronous pixel copies, never an encode/decode round trip.

use egui::Pos2;
use image::{Rgba, RgbaImage};

/// The mutable raster bitmap. Width and height are device pixels and fixed
/// for the lifetime of the surface (file import replaces contents, not size).
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a surface filled with an opaque background color.
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        let [r, g, b] = background;
        let pixels = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([r, g, b, 255]));
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Read a single pixel. `None` when out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.pixels.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Write a single pixel. Out-of-bounds writes are dropped.
    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        if x < self.width() && y < self.height() {
            self.pixels.put_pixel(x, y, pixel);
        }
    }

    /// The full raster as a flat row-major RGBA byte slice.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Copy the full raster out as an owned byte buffer.
    pub fn to_raw_vec(&self) -> Vec<u8> {
        self.pixels.as_raw().clone()
    }

    /// Write a full RGBA buffer back over the raster in one step. The buffer
    /// length must match `width * height * 4` exactly.
    pub fn write_raw(&mut self, data: &[u8]) {
        debug_assert_eq!(data.len(), self.as_raw().len());
        if data.len() == self.as_raw().len() {
            self.pixels.as_mut().copy_from_slice(data);
        }
    }

    /// Fill the whole surface with an opaque color.
    pub fn fill(&mut self, color: [u8; 3]) {
        let [r, g, b] = color;
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([r, g, b, 255]);
        }
    }

    /// Clear a rectangle to full transparency (true alpha erase).
    pub fn clear_rect(&mut self, rect: SelectionRect) {
        let x1 = (rect.x + rect.width).min(self.width());
        let y1 = (rect.y + rect.height).min(self.height());
        for y in rect.y..y1 {
            for x in rect.x..x1 {
                self.pixels.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }

    /// Replace the surface contents with an image of identical dimensions.
    pub fn replace(&mut self, image: RgbaImage) {
        debug_assert_eq!((image.width(), image.height()), (self.width(), self.height()));
        self.pixels = image;
    }

    /// Take an immutable point-in-time copy of the full surface.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixels: self.pixels.clone(),
        }
    }

    /// Overwrite the full surface from a snapshot.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.pixels = snapshot.pixels.clone();
    }
}

/// An immutable serialized copy of the surface at one instant.
///
/// Used as the preview base during shape drags and as a history entry.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.pixels.dimensions() == other.pixels.dimensions()
            && self.pixels.as_raw() == other.pixels.as_raw()
    }
}

impl Eq for Snapshot {}

/// An axis-aligned rectangle marking a region eligible for clearing.
/// Always stored normalized (non-negative extent).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SelectionRect {
    /// Build from two opposite drag corners in canvas coordinates,
    /// normalized and clamped to the surface bounds.
    pub fn from_drag(a: Pos2, b: Pos2, surface_w: u32, surface_h: u32) -> Self {
        let min_x = a.x.min(b.x).max(0.0).round() as u32;
        let min_y = a.y.min(b.y).max(0.0).round() as u32;
        let max_x = (a.x.max(b.x).round().max(0.0) as u32).min(surface_w);
        let max_y = (a.y.max(b.y).round().max(0.0) as u32).min(surface_h);
        Self {
            x: min_x.min(max_x),
            y: min_y.min(max_y),
            width: max_x.saturating_sub(min_x),
            height: max_y.saturating_sub(min_y),
        }
    }

    pub fn full(surface_w: u32, surface_h: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: surface_w,
            height: surface_h,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_restore_is_bit_identical() {
        let mut surface = Surface::new(8, 8, [10, 20, 30]);
        let before = surface.snapshot();
        surface.put_pixel(3, 3, Rgba([255, 0, 0, 255]));
        assert_ne!(surface.snapshot(), before);
        surface.restore(&before);
        assert_eq!(surface.snapshot(), before);
    }

    #[test]
    fn clear_rect_erases_to_transparent() {
        let mut surface = Surface::new(10, 10, [255, 255, 255]);
        surface.clear_rect(SelectionRect {
            x: 2,
            y: 2,
            width: 3,
            height: 3,
        });
        assert_eq!(surface.get_pixel(3, 3), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(surface.get_pixel(1, 1), Some(Rgba([255, 255, 255, 255])));
        // A rect hanging off the edge clears only the overlap.
        surface.clear_rect(SelectionRect {
            x: 8,
            y: 8,
            width: 10,
            height: 10,
        });
        assert_eq!(surface.get_pixel(9, 9), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn selection_normalizes_reversed_drag() {
        let rect = SelectionRect::from_drag(Pos2::new(50.0, 40.0), Pos2::new(10.0, 20.0), 100, 100);
        assert_eq!(
            rect,
            SelectionRect {
                x: 10,
                y: 20,
                width: 40,
                height: 20
            }
        );
    }

    #[test]
    fn write_raw_round_trips() {
        let mut surface = Surface::new(4, 4, [0, 0, 0]);
        let mut data = surface.to_raw_vec();
        data[0] = 99;
        surface.write_raw(&data);
        assert_eq!(surface.as_raw()[0], 99);
    }
}
