#![warn(missing_docs)]

//! Mesh-to-voxel slicing.
//!
//! This crate turns a textured triangle mesh into a dense colored voxel grid
//! by rendering one voxel-thick orthographic slab per layer along each axis,
//! merging the renders with a mip-level priority, optionally filling the
//! enclosed interior, and exporting the grid as 2D slice images.
//!
//! Rendering and image encoding are behind the [`Renderer`] and
//! [`ImageWriter`] traits.
//!
//! # Example
//!
//! ```ignore
//! use voxslice::{voxelize, export_slices, VoxelizeSettings};
//!
//! let scene = voxslice_scene::load_scene("model.obj")?;
//! let mut renderer = voxslice_raster::SoftwareRenderer::new(&scene, (512, 512))?;
//! let result = voxelize(&scene, &mut renderer, &VoxelizeSettings::default())?;
//!
//! println!("Grid: {}", result.stats.dim);
//! export_slices(&result.grid, result.settings.export_axis, "slice", false, &mut writer)?;
//! ```

pub mod error;
pub mod export;
pub mod fill;
pub mod geometry;
pub mod grid;
pub mod ingest;
pub mod render;
pub mod scene;

pub use error::{ExportError, RenderError, Result, VoxelError};
pub use export::{
    export_slices, layer_path, quantize, slice_image, stacked_image, ImageWriter, SliceImage,
};
pub use fill::{fill_interior, FillMode, FillReport};
pub use geometry::{
    cross_section, deduce_dimensions, layer_position, projection_window, slice_position, Axis,
    GridDim, ProjectionWindow, RequestedShape, SweepDirection,
};
pub use grid::{VoxelCell, VoxelGrid, NO_PRIORITY};
pub use render::{
    CullMode, DrawMode, FrameMut, Interpolation, RenderRequest, Renderer, SliceBuffers,
};
pub use scene::{Material, Mesh, Scene, Texture};

use serde::{Deserialize, Serialize};

/// Voxelization parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelizeSettings {
    /// Requested output shape; open components follow the model's aspect.
    pub shape: RequestedShape,
    /// Texture filtering for the color pass. Only [`Interpolation::Mipmap`]
    /// enables the priority pass.
    pub interpolation: Interpolation,
    /// Interior fill applied after all sweeps.
    pub fill: FillMode,
    /// Make the back Z sweep authoritative: the front Z sweep is skipped and
    /// the back one renders unculled and overwrites.
    pub prefer_front: bool,
    /// Axis the slices are exported along.
    pub export_axis: Axis,
    /// Export every layer into one vertically stacked image.
    pub single_file: bool,
}

impl VoxelizeSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let RequestedShape {
            width,
            height,
            layers,
        } = self.shape;
        for (name, value) in [("width", width), ("height", height), ("layers", layers)] {
            if value == Some(0) {
                return Err(VoxelError::InvalidSettings(format!(
                    "{name} must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// Statistics about one voxelization run.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelizeStats {
    /// Resolved grid dimensions.
    pub dim: GridDim,
    /// Layers rendered and ingested, across all sweeps.
    pub slices_rendered: usize,
    /// Renderer invocations, priority passes included.
    pub render_passes: usize,
    /// Cells holding a rasterized sample before fill.
    pub surface_cells: usize,
    /// Interior fill counters.
    pub fill: FillReport,
}

/// Result of voxelization.
#[derive(Debug, Clone)]
pub struct VoxelizeResult {
    /// The filled grid.
    pub grid: VoxelGrid,
    /// Run statistics.
    pub stats: VoxelizeStats,
    /// Settings the run used.
    pub settings: VoxelizeSettings,
}

/// Voxelize a scene with the given renderer and settings.
///
/// This is the main entry point. It:
/// 1. Resolves the grid shape against the scene bounds
/// 2. Sweeps front then back, each over X, Y and Z, rendering every layer
///    (a mip-level pass first when mipmapping) and merging it into the grid
/// 3. Fills the interior if requested
pub fn voxelize<R: Renderer + ?Sized>(
    scene: &Scene,
    renderer: &mut R,
    settings: &VoxelizeSettings,
) -> Result<VoxelizeResult> {
    settings.validate()?;

    let bounds = scene.bounds();
    let dim = deduce_dimensions(settings.shape, bounds)?;
    log::info!(
        "voxelizing into {dim} ({} cells), filter {}, fill {}",
        dim.len(),
        settings.interpolation,
        settings.fill
    );

    let mut grid = VoxelGrid::new(dim);
    let mut slices_rendered = 0;
    let mut render_passes = 0;

    for direction in SweepDirection::ALL {
        for axis in Axis::ALL {
            let (cull, force_overwrite) = match (settings.prefer_front && axis == Axis::Z, direction) {
                (true, SweepDirection::Front) => {
                    log::debug!("skipping {direction:?} sweep along {axis}");
                    continue;
                }
                (true, SweepDirection::Back) => (CullMode::None, true),
                (false, _) => (direction.cull_mode(), false),
            };

            let (width, height) = dim.cross_section(axis);
            log::debug!(
                "{direction:?} sweep along {axis}: {} layers of {width}x{height}",
                dim[axis]
            );

            for layer in 0..dim[axis] {
                let window = projection_window(dim, axis, layer, bounds, direction);
                let mut request = RenderRequest {
                    transform: window.transform(),
                    width,
                    height,
                    cull,
                    mode: DrawMode::MipLevel,
                    filter: settings.interpolation,
                };

                if settings.interpolation.uses_mipmaps() {
                    renderer.render(scene, &request, grid.buffers_mut().frame_mut(width, height)?)?;
                    grid.capture_priority(axis);
                    render_passes += 1;
                }

                request.mode = DrawMode::Shaded;
                renderer.render(scene, &request, grid.buffers_mut().frame_mut(width, height)?)?;
                grid.ingest_layer(layer, axis, force_overwrite);
                render_passes += 1;
                slices_rendered += 1;
            }
        }
    }

    let surface_cells = grid.occupied_count();
    log::info!("{surface_cells} surface cells from {slices_rendered} slices");

    let fill = fill_interior(&mut grid, bounds.size(), settings.fill);
    if settings.fill != FillMode::None {
        log::info!(
            "filled {} interior cells in {} iterations",
            fill.filled_cells,
            fill.fill_iterations
        );
    }

    Ok(VoxelizeResult {
        grid,
        stats: VoxelizeStats {
            dim,
            slices_rendered,
            render_passes,
            surface_cells,
            fill,
        },
        settings: settings.clone(),
    })
}
