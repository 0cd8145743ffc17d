//! Error types for voxelization.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, filling or exporting a voxel grid.
#[derive(Error, Debug)]
pub enum VoxelError {
    /// Malformed requested output shape.
    #[error("invalid dimensions: {0}")]
    InvalidShape(String),

    /// Model bounding box has zero extent on at least one axis.
    #[error("model bounding box is degenerate (zero extent on some axis)")]
    DegenerateBounds,

    /// Scene contains no meshes.
    #[error("scene contains no meshes")]
    EmptyScene,

    /// A mesh has no faces or no positions.
    #[error("mesh {0} has no faces or positions")]
    EmptyMesh(usize),

    /// A mesh references vertices it does not have.
    #[error("mesh {0} is malformed: {1}")]
    MalformedMesh(usize, String),

    /// Invalid run settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The renderer failed to produce a slice.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Writing an exported slice failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors reported by a [`Renderer`](crate::Renderer) implementation.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Requested viewport does not fit the scratch buffers.
    #[error("viewport {width}x{height} exceeds scratch capacity of {capacity} pixels")]
    ViewportTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
        /// Pixel capacity of the buffers.
        capacity: usize,
    },

    /// Backend-specific failure.
    #[error("render backend failed: {0}")]
    Backend(String),
}

/// Errors reported by an [`ImageWriter`](crate::ImageWriter).
#[derive(Error, Debug)]
#[error("failed to write {}: {message}", path.display())]
pub struct ExportError {
    /// Destination path.
    pub path: PathBuf,
    /// Underlying failure.
    pub message: String,
}

/// Result type for voxelization operations.
pub type Result<T> = std::result::Result<T, VoxelError>;
