//! Slice export: read the grid back out as 2D RGBA8 images.

use std::path::{Path, PathBuf};

use voxslice_math::Color;

use crate::error::{ExportError, Result};
use crate::geometry::{layer_position, Axis};
use crate::grid::VoxelGrid;

/// Tightly packed RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceImage {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl SliceImage {
    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width * 4
    }

    /// RGBA of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let o = y * self.stride() + x * 4;
        [
            self.pixels[o],
            self.pixels[o + 1],
            self.pixels[o + 2],
            self.pixels[o + 3],
        ]
    }
}

/// Sink for exported slices, typically an image encoder.
pub trait ImageWriter {
    /// Write `image` to `path`.
    fn write_image(&mut self, path: &Path, image: &SliceImage) -> std::result::Result<(), ExportError>;
}

/// Convert a color in `[0, 1]` to RGBA8, rounding to nearest.
pub fn quantize(color: &Color) -> [u8; 4] {
    let q = color.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8);
    [q[0], q[1], q[2], q[3]]
}

/// Image of one layer along `axis`.
///
/// Row `y` of the image holds grid row `v = y`; empty cells are transparent
/// black.
pub fn slice_image(grid: &VoxelGrid, axis: Axis, layer: usize) -> SliceImage {
    let (w, h) = grid.dim().cross_section(axis);
    let mut pixels = Vec::with_capacity(w * h * 4);
    write_layer(grid, axis, layer, &mut pixels);
    SliceImage {
        width: w,
        height: h,
        pixels,
    }
}

/// All layers along `axis` stacked vertically, layer 0 on top.
pub fn stacked_image(grid: &VoxelGrid, axis: Axis) -> SliceImage {
    let (w, h) = grid.dim().cross_section(axis);
    let layers = grid.dim()[axis];
    let mut pixels = Vec::with_capacity(w * h * layers * 4);
    for layer in 0..layers {
        write_layer(grid, axis, layer, &mut pixels);
    }
    SliceImage {
        width: w,
        height: h * layers,
        pixels,
    }
}

fn write_layer(grid: &VoxelGrid, axis: Axis, layer: usize, out: &mut Vec<u8>) {
    let (w, h) = grid.dim().cross_section(axis);
    for v in 0..h {
        for u in 0..w {
            let cell = &grid[layer_position(axis, layer, (u, v))];
            out.extend_from_slice(&quantize(&cell.color));
        }
    }
}

/// File name for `layer` out of `layer_count`: the prefix followed by the
/// layer index zero-padded to the width of the largest index.
pub fn layer_path(prefix: &str, layer: usize, layer_count: usize) -> PathBuf {
    let width = layer_count.saturating_sub(1).max(1).to_string().len();
    PathBuf::from(format!("{prefix}{layer:0width$}.png"))
}

/// Write the grid along `axis` through `writer`.
///
/// With `single_file` all layers go into `{prefix}.png`; otherwise each layer
/// gets its own file from [`layer_path`]. Returns the written paths in order.
pub fn export_slices(
    grid: &VoxelGrid,
    axis: Axis,
    prefix: &str,
    single_file: bool,
    writer: &mut dyn ImageWriter,
) -> Result<Vec<PathBuf>> {
    if single_file {
        let path = PathBuf::from(format!("{prefix}.png"));
        writer.write_image(&path, &stacked_image(grid, axis))?;
        log::info!("wrote {}", path.display());
        return Ok(vec![path]);
    }

    let layers = grid.dim()[axis];
    let mut written = Vec::with_capacity(layers);
    for layer in 0..layers {
        let path = layer_path(prefix, layer, layers);
        writer.write_image(&path, &slice_image(grid, axis, layer))?;
        written.push(path);
    }
    log::info!("wrote {layers} slices along {axis} with prefix {prefix}");
    Ok(written)
}
