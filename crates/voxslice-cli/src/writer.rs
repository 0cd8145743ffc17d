//! PNG output through the `image` crate.

use std::path::Path;

use image::{ColorType, ImageFormat};
use voxslice::{ExportError, ImageWriter, SliceImage};

/// Writes slices as 8-bit RGBA PNG files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngWriter;

impl ImageWriter for PngWriter {
    fn write_image(&mut self, path: &Path, image: &SliceImage) -> Result<(), ExportError> {
        let export_error = |message: String| ExportError {
            path: path.to_path_buf(),
            message,
        };
        let width = u32::try_from(image.width).map_err(|e| export_error(e.to_string()))?;
        let height = u32::try_from(image.height).map_err(|e| export_error(e.to_string()))?;
        image::save_buffer_with_format(
            path,
            &image.pixels,
            width,
            height,
            ColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(|e| export_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slice0.png");
        let slice = SliceImage {
            width: 2,
            height: 1,
            pixels: vec![255, 0, 0, 255, 10, 20, 30, 40],
        };
        PngWriter.write_image(&path, &slice).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.into_raw(), slice.pixels);
    }

    #[test]
    fn test_unwritable_path_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("slice0.png");
        let slice = SliceImage {
            width: 1,
            height: 1,
            pixels: vec![0; 4],
        };
        let err = PngWriter.write_image(&path, &slice).unwrap_err();
        assert_eq!(err.path, path);
    }
}
