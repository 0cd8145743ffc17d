//! Error types for the software renderer.

use thiserror::Error;

/// Errors that can occur while setting up a [`SoftwareRenderer`](crate::SoftwareRenderer).
#[derive(Error, Debug)]
pub enum RasterError {
    /// Surface has a zero dimension.
    #[error("invalid surface size {width}x{height}")]
    InvalidSurface {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Surface exceeds the per-side limit.
    #[error("surface {width}x{height} exceeds the limit of {max} pixels per side")]
    SurfaceTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
        /// Largest supported side.
        max: usize,
    },

    /// A scene texture does not hold `width * height` RGBA8 pixels.
    #[error("texture {index} is malformed: {message}")]
    MalformedTexture {
        /// Index into the scene's textures.
        index: usize,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for renderer setup.
pub type Result<T> = std::result::Result<T, RasterError>;
