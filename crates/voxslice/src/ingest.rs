//! Slice ingestion: fold one rendered layer into the grid.

use voxslice_math::Color;

use crate::geometry::{layer_position, Axis};
use crate::grid::VoxelGrid;

impl VoxelGrid {
    /// Latch the last mip-level pass into the priority buffer.
    ///
    /// Covered pixels take the level from the red channel; everything else
    /// gets priority 0.
    pub fn capture_priority(&mut self, axis: Axis) {
        let (w, h) = self.dim.cross_section(axis);
        let buffers = &mut self.buffers;
        for o in 0..w * h {
            buffers.priority[o] = if buffers.coverage[o] != 0 {
                buffers.color[o * 4]
            } else {
                0
            };
        }
    }

    /// Merge the last color pass into `layer` of `axis`.
    ///
    /// Every covered pixel becomes a sample for the voxel it maps to, with
    /// the priority latched by [`capture_priority`](Self::capture_priority).
    /// With `force_overwrite` the sample replaces whatever the cell held.
    pub fn ingest_layer(&mut self, layer: usize, axis: Axis, force_overwrite: bool) {
        let (w, h) = self.dim.cross_section(axis);
        let Self {
            dim,
            cells,
            buffers,
        } = self;

        for y in 0..h {
            for x in 0..w {
                let o = x + y * w;
                if buffers.coverage[o] == 0 {
                    continue;
                }

                let pos = layer_position(axis, layer, (x, y));
                let Some(index) = dim.index_of(pos) else {
                    continue;
                };
                let px = &buffers.color[o * 4..o * 4 + 4];
                let color = Color::new(
                    f32::from(px[0]),
                    f32::from(px[1]),
                    f32::from(px[2]),
                    f32::from(px[3]),
                ) / 255.0;
                let priority = u32::from(buffers.priority[o]);

                let cell = &mut cells[index];
                if force_overwrite {
                    cell.replace(color, priority);
                } else {
                    cell.merge_sample(color, priority, true);
                }
            }
        }
    }
}
