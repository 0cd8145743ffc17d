//! Error types for scene loading.

use std::path::PathBuf;

use thiserror::Error;
use voxslice::VoxelError;

/// Errors that can occur while loading a model and its assets.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The model file could not be read or parsed.
    #[error("failed to open {}: {message}", path.display())]
    Open {
        /// Model path.
        path: PathBuf,
        /// Parser or I/O failure.
        message: String,
    },

    /// A material library could not be read or parsed.
    #[error("failed to load materials for {}: {message}", path.display())]
    Material {
        /// Model path.
        path: PathBuf,
        /// Failing libraries and their errors.
        message: String,
    },

    /// A texture could not be read or decoded.
    #[error("failed to read texture {}: {source}", path.display())]
    Texture {
        /// Texture path.
        path: PathBuf,
        /// Decoder failure.
        source: image::ImageError,
    },

    /// The loaded geometry is unusable.
    #[error(transparent)]
    Geometry(#[from] VoxelError),
}

/// Result type for scene loading.
pub type Result<T> = std::result::Result<T, SceneError>;
