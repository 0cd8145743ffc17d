//! Dense voxel storage and the per-cell sample merge policy.

use std::ops::{Index, IndexMut};

use voxslice_math::Color;

use crate::geometry::GridDim;
use crate::render::SliceBuffers;

/// Priority of a cell that has not received any sample.
pub const NO_PRIORITY: u32 = u32::MAX;

/// One grid cell: a running color average plus the best sample priority.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelCell {
    /// RGBA in `[0, 1]`.
    pub color: Color,
    /// Number of samples merged so far; 0 means empty.
    pub sample_count: u32,
    /// Lowest (sharpest) resolution level seen, [`NO_PRIORITY`] if none.
    pub priority: u32,
}

impl Default for VoxelCell {
    fn default() -> Self {
        Self {
            color: Color::zeros(),
            sample_count: 0,
            priority: NO_PRIORITY,
        }
    }
}

impl VoxelCell {
    /// True if no sample has touched this cell.
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Merge one rasterized sample.
    ///
    /// An empty cell, or (with `overwrite_if_better`) a sample with a
    /// numerically smaller priority, replaces the cell. Anything else is
    /// folded into the running average and leaves the priority alone.
    pub fn merge_sample(&mut self, color: Color, priority: u32, overwrite_if_better: bool) {
        if self.is_empty() || (overwrite_if_better && priority < self.priority) {
            self.replace(color, priority);
        } else {
            let n = self.sample_count as f32;
            self.color = (self.color * n + color) / (n + 1.0);
            self.sample_count += 1;
        }
    }

    /// Unconditionally reset the cell to a single sample.
    pub fn replace(&mut self, color: Color, priority: u32) {
        self.color = color;
        self.sample_count = 1;
        self.priority = priority;
    }
}

/// Dense 3D grid of [`VoxelCell`]s plus reusable slice scratch buffers.
///
/// Cells are stored at `z * dim.x * dim.y + y * dim.x + x`.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    pub(crate) dim: GridDim,
    pub(crate) cells: Vec<VoxelCell>,
    pub(crate) buffers: SliceBuffers,
}

impl VoxelGrid {
    /// Allocate an empty grid. Scratch buffers are sized for the largest
    /// cross-section.
    pub fn new(dim: GridDim) -> Self {
        Self {
            dim,
            cells: vec![VoxelCell::default(); dim.len()],
            buffers: SliceBuffers::new(dim.max_cross_section_area()),
        }
    }

    /// Grid dimensions.
    pub fn dim(&self) -> GridDim {
        self.dim
    }

    /// Cell at `pos`, or `None` when out of range.
    pub fn get(&self, pos: [usize; 3]) -> Option<&VoxelCell> {
        self.dim.index_of(pos).map(|i| &self.cells[i])
    }

    /// Mutable cell at `pos`, or `None` when out of range.
    pub fn get_mut(&mut self, pos: [usize; 3]) -> Option<&mut VoxelCell> {
        self.dim.index_of(pos).map(move |i| &mut self.cells[i])
    }

    /// All cells in storage order.
    pub fn cells(&self) -> &[VoxelCell] {
        &self.cells
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Scratch buffers.
    pub fn buffers(&self) -> &SliceBuffers {
        &self.buffers
    }

    /// Scratch buffers, for a renderer to draw into.
    pub fn buffers_mut(&mut self) -> &mut SliceBuffers {
        &mut self.buffers
    }
}

impl Index<[usize; 3]> for VoxelGrid {
    type Output = VoxelCell;

    fn index(&self, pos: [usize; 3]) -> &VoxelCell {
        match self.get(pos) {
            Some(cell) => cell,
            None => panic!("voxel {pos:?} out of range for grid {}", self.dim),
        }
    }
}

impl IndexMut<[usize; 3]> for VoxelGrid {
    fn index_mut(&mut self, pos: [usize; 3]) -> &mut VoxelCell {
        let dim = self.dim;
        match self.get_mut(pos) {
            Some(cell) => cell,
            None => panic!("voxel {pos:?} out of range for grid {dim}"),
        }
    }
}
