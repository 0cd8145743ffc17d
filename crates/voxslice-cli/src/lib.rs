#![warn(missing_docs)]

//! The `voxslice` command line.
//!
//! Glues the OBJ loader, the software renderer and PNG output around
//! [`voxslice::voxelize`].

pub mod args;
pub mod error;
pub mod writer;

use std::path::PathBuf;

use voxslice::{deduce_dimensions, export_slices, voxelize, VoxelizeStats};
use voxslice_raster::{surface_for, SoftwareRenderer};

pub use args::Cli;
pub use error::CliError;
pub use writer::PngWriter;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Voxelization statistics.
    pub stats: VoxelizeStats,
    /// Written image files, in layer order.
    pub files: Vec<PathBuf>,
}

/// Load, voxelize and export according to `cli`.
pub fn run(cli: &Cli) -> Result<RunSummary, CliError> {
    let settings = cli.resolve_settings()?;

    let scene = voxslice_scene::load_scene(&cli.model)?;

    let dim = deduce_dimensions(settings.shape, scene.bounds())?;
    let mut renderer = SoftwareRenderer::new(&scene, surface_for(dim))?;

    let result = voxelize(&scene, &mut renderer, &settings)?;
    let files = export_slices(
        &result.grid,
        settings.export_axis,
        &cli.output,
        settings.single_file,
        &mut PngWriter,
    )?;

    Ok(RunSummary {
        stats: result.stats,
        files,
    })
}
