//! Image import and export.
//!
//! Import sniffs the format from the file bytes against a small allow-list,
//! enforces a size cap before decoding, and aspect-fits the result onto a
//! canvas-sized backdrop. Export writes the surface as PNG.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ImageEncoder, ImageFormat, RgbaImage};

use crate::error::{ExportError, ImportError};

/// Import size cap, 10 MiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Suggested file name for exported drawings.
pub const EXPORT_FILE_NAME: &str = "paintr-drawing.png";

/// Formats accepted on import.
const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Load an image file, enforcing the size cap and the format allow-list.
/// The format is sniffed from the bytes, never from the file extension.
pub fn load_image(path: &Path) -> Result<RgbaImage, ImportError> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(ImportError::FileTooLarge(size));
    }
    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .map_err(|_| ImportError::UnsupportedFileType("unrecognized image data".into()))?;
    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImportError::UnsupportedFileType(format!("{format:?}")));
    }
    let decoded = image::load_from_memory_with_format(&bytes, format)?;
    Ok(decoded.to_rgba8())
}

/// Scale `img` to fit a canvas of `width`×`height` preserving aspect ratio,
/// centered over an opaque backdrop of the background color.
pub fn fit_to_canvas(img: &RgbaImage, width: u32, height: u32, background: [u8; 3]) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([background[0], background[1], background[2], 255]),
    );
    if img.width() == 0 || img.height() == 0 || width == 0 || height == 0 {
        return out;
    }
    let scale = (width as f32 / img.width() as f32).min(height as f32 / img.height() as f32);
    let new_w = ((img.width() as f32 * scale).round() as u32).max(1);
    let new_h = ((img.height() as f32 * scale).round() as u32).max(1);
    let resized = image::imageops::resize(img, new_w, new_h, FilterType::Triangle);
    let off_x = ((width - new_w) / 2) as i64;
    let off_y = ((height - new_h) / 2) as i64;
    image::imageops::overlay(&mut out, &resized, off_x, off_y);
    out
}

/// Write the surface pixels to `path` as PNG.
pub fn export_png(path: &Path, pixels: &RgbaImage) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    PngEncoder::new(writer)
        .write_image(
            pixels.as_raw(),
            pixels.width(),
            pixels.height(),
            image::ColorType::Rgba8,
        )
        .map_err(ExportError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        let img = checker(16, 16);
        export_png(&path, &img).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded, img);
    }

    #[test]
    fn unrecognized_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, b"not an image at all").unwrap();
        assert!(matches!(
            load_image(&path),
            Err(ImportError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn oversized_files_are_rejected_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.bin");
        let file = File::create(&path).unwrap();
        file.set_len(MAX_FILE_SIZE + 1).unwrap();
        assert!(matches!(load_image(&path), Err(ImportError::FileTooLarge(_))));
    }

    #[test]
    fn extension_does_not_override_sniffing() {
        // BMP bytes behind a .png name still get refused.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        let mut bmp_bytes = Vec::new();
        let img = checker(4, 4);
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bmp_bytes), ImageFormat::Bmp)
            .unwrap();
        std::fs::write(&path, &bmp_bytes).unwrap();
        assert!(matches!(
            load_image(&path),
            Err(ImportError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn wide_image_is_letterboxed_onto_the_background() {
        let img = RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 255]));
        let out = fit_to_canvas(&img, 40, 40, [7, 7, 7]);
        assert_eq!(out.dimensions(), (40, 40));
        // Scaled to 40x20, centred vertically: rows 0..10 and 30..40 are backdrop.
        assert_eq!(*out.get_pixel(20, 2), Rgba([7, 7, 7, 255]));
        assert_eq!(*out.get_pixel(20, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(20, 38), Rgba([7, 7, 7, 255]));
    }
}
