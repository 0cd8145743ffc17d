//! The renderer boundary: what the voxelizer asks of a rasterizer and the
//! scratch buffers it renders into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voxslice_math::Transform;

use crate::error::{RenderError, VoxelError};
use crate::scene::Scene;

/// Texture filtering used by the color pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest texel of the base level.
    Nearest,
    /// Bilinear filtering of the base level.
    Linear,
    /// Trilinear filtering across mip levels.
    #[default]
    Mipmap,
}

impl Interpolation {
    /// Whether sampling goes through mip levels, which is what makes a
    /// priority pass meaningful.
    pub fn uses_mipmaps(self) -> bool {
        matches!(self, Interpolation::Mipmap)
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Linear => "linear",
            Interpolation::Mipmap => "mipmap",
        };
        f.write_str(name)
    }
}

impl FromStr for Interpolation {
    type Err = VoxelError;

    fn from_str(s: &str) -> Result<Self, VoxelError> {
        match s {
            "n" | "nearest" => Ok(Interpolation::Nearest),
            "l" | "linear" => Ok(Interpolation::Linear),
            "m" | "mipmap" => Ok(Interpolation::Mipmap),
            _ => Err(VoxelError::InvalidSettings(format!(
                "unknown interpolation mode {s}"
            ))),
        }
    }
}

/// Which triangle faces are discarded before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// Draw both faces.
    None,
    /// Discard counter-clockwise (front) faces.
    Front,
    /// Discard clockwise (back) faces.
    Back,
}

/// What the renderer writes into the color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Shaded RGBA: texture sample or flat material color.
    Shaded,
    /// Sampled mip level in the red channel. Only textured geometry is drawn.
    MipLevel,
}

/// One draw of the whole scene into a slice.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Model-to-clip transform.
    pub transform: Transform,
    /// Viewport width in pixels.
    pub width: usize,
    /// Viewport height in pixels.
    pub height: usize,
    /// Face culling.
    pub cull: CullMode,
    /// Output selection.
    pub mode: DrawMode,
    /// Texture filtering.
    pub filter: Interpolation,
}

/// Mutable view of the scratch buffers cut to one viewport.
///
/// Both slices are row-major with no padding: `color` holds
/// `width * height * 4` bytes, `coverage` holds `width * height`.
/// Row 0 is the bottom of the viewport (NDC y = -1).
pub struct FrameMut<'a> {
    /// Viewport width.
    pub width: usize,
    /// Viewport height.
    pub height: usize,
    /// RGBA8 color.
    pub color: &'a mut [u8],
    /// Nonzero where mesh geometry passed the depth test.
    pub coverage: &'a mut [u8],
}

/// A rasterizer that can draw a scene into a slice.
pub trait Renderer {
    /// Draw `scene` as described by `request` into `frame`.
    ///
    /// Implementations clear the frame first. Background pixels must read
    /// back with coverage 0.
    fn render(
        &mut self,
        scene: &Scene,
        request: &RenderRequest,
        frame: FrameMut<'_>,
    ) -> Result<(), RenderError>;
}

/// Scratch buffers sized once for the largest cross-section and reused for
/// every layer.
#[derive(Debug, Clone)]
pub struct SliceBuffers {
    capacity: usize,
    pub(crate) color: Vec<u8>,
    pub(crate) coverage: Vec<u8>,
    pub(crate) priority: Vec<u8>,
}

impl SliceBuffers {
    /// Allocate buffers for `capacity` pixels.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            color: vec![0; capacity * 4],
            coverage: vec![0; capacity],
            priority: vec![0; capacity],
        }
    }

    /// Pixel capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Color buffer, RGBA8.
    pub fn color(&self) -> &[u8] {
        &self.color
    }

    /// Coverage buffer.
    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }

    /// Per-pixel priority captured from the last mip-level pass.
    pub fn priority(&self) -> &[u8] {
        &self.priority
    }

    /// Borrow the color and coverage buffers for a `width` x `height` viewport.
    pub fn frame_mut(&mut self, width: usize, height: usize) -> Result<FrameMut<'_>, RenderError> {
        let area = width * height;
        if area > self.capacity {
            return Err(RenderError::ViewportTooLarge {
                width,
                height,
                capacity: self.capacity,
            });
        }
        Ok(FrameMut {
            width,
            height,
            color: &mut self.color[..area * 4],
            coverage: &mut self.coverage[..area],
        })
    }
}
