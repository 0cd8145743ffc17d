//! Failure classification for the command line.

use thiserror::Error;
use voxslice::VoxelError;
use voxslice_raster::RasterError;
use voxslice_scene::SceneError;

/// A failed run, classified by the stage that failed.
#[derive(Error, Debug)]
pub enum CliError {
    /// Bad arguments or settings file.
    #[error("{0:#}")]
    Usage(anyhow::Error),

    /// The model or its assets could not be loaded.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// The renderer could not be set up.
    #[error(transparent)]
    Renderer(#[from] RasterError),

    /// Rendering or writing the slices failed.
    #[error(transparent)]
    Output(VoxelError),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 1,
            CliError::Scene(_) => 2,
            CliError::Renderer(_) => 3,
            CliError::Output(_) => 4,
        }
    }
}

impl From<VoxelError> for CliError {
    fn from(err: VoxelError) -> Self {
        match err {
            VoxelError::InvalidShape(_) | VoxelError::InvalidSettings(_) => {
                CliError::Usage(err.into())
            }
            VoxelError::DegenerateBounds
            | VoxelError::EmptyScene
            | VoxelError::EmptyMesh(_)
            | VoxelError::MalformedMesh(..) => CliError::Scene(err.into()),
            VoxelError::Render(_) | VoxelError::Export(_) => CliError::Output(err),
        }
    }
}
