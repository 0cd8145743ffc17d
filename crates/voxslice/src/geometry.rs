//! Grid geometry: shape deduction, axis/layer mapping and slab projections.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use voxslice_math::{Aabb, Transform};

use crate::error::{Result, VoxelError};
use crate::render::CullMode;

/// Layer count used when the requested shape leaves it open.
pub const DEFAULT_LAYERS: u32 = 10;

/// Fraction of a layer step the slab is widened by on each side, so geometry
/// lying exactly on a slab boundary is not clipped away.
pub const SLAB_EPSILON: f64 = 0.001;

/// One of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Model X.
    X,
    /// Model Y.
    Y,
    /// Model Z (the layer axis by default).
    #[default]
    Z,
}

impl Axis {
    /// All axes in sweep order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1 or 2).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = VoxelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Axis::X),
            "y" | "1" => Ok(Axis::Y),
            "z" | "2" => Ok(Axis::Z),
            _ => Err(VoxelError::InvalidSettings(format!("unknown axis {s}"))),
        }
    }
}

/// Which side of each slab a sweep keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Front faces, farthest surface within the slab.
    Front,
    /// Back faces, nearest surface within the slab.
    Back,
}

impl SweepDirection {
    /// Both directions in sweep order.
    pub const ALL: [SweepDirection; 2] = [SweepDirection::Front, SweepDirection::Back];

    /// Face culling used by this direction.
    pub fn cull_mode(self) -> CullMode {
        match self {
            SweepDirection::Front => CullMode::Back,
            SweepDirection::Back => CullMode::Front,
        }
    }
}

/// Dimensions of a dense voxel grid. Every component is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDim {
    /// Cells along X.
    pub x: usize,
    /// Cells along Y.
    pub y: usize,
    /// Cells along Z.
    pub z: usize,
}

impl GridDim {
    /// Create grid dimensions, rejecting empty axes and cell counts that do
    /// not fit in `usize`.
    pub fn new(x: usize, y: usize, z: usize) -> Result<Self> {
        if x == 0 || y == 0 || z == 0 {
            return Err(VoxelError::InvalidShape(format!(
                "grid {x}x{y}x{z} has an empty axis"
            )));
        }
        if x.checked_mul(y).and_then(|xy| xy.checked_mul(z)).is_none() {
            return Err(VoxelError::InvalidShape(format!(
                "grid {x}x{y}x{z} has too many cells"
            )));
        }
        Ok(Self { x, y, z })
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.x * self.y * self.z
    }

    /// True if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest dimension.
    pub fn max(&self) -> usize {
        self.x.max(self.y).max(self.z)
    }

    /// Linear index of `[x, y, z]`, or `None` when out of range.
    pub fn index_of(&self, pos: [usize; 3]) -> Option<usize> {
        let [x, y, z] = pos;
        if x >= self.x || y >= self.y || z >= self.z {
            return None;
        }
        Some(z * self.x * self.y + y * self.x + x)
    }

    /// The two dimensions orthogonal to `axis`.
    pub fn cross_section(&self, axis: Axis) -> (usize, usize) {
        cross_section(*self, axis)
    }

    /// Largest cross-section area over the three axes.
    pub fn max_cross_section_area(&self) -> usize {
        Axis::ALL
            .iter()
            .map(|&a| {
                let (u, v) = self.cross_section(a);
                u * v
            })
            .max()
            .unwrap_or(0)
    }
}

impl Index<Axis> for GridDim {
    type Output = usize;

    fn index(&self, axis: Axis) -> &usize {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl fmt::Display for GridDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// A partially specified output shape. `None` components are derived from
/// the model's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestedShape {
    /// Output image width (grid X).
    pub width: Option<u32>,
    /// Output image height (grid Y).
    pub height: Option<u32>,
    /// Number of layers (grid Z).
    pub layers: Option<u32>,
}

impl FromStr for RequestedShape {
    type Err = VoxelError;

    /// Parse `WIDTHxHEIGHTxLAYERS`, `WIDTHxLAYERS` or `LAYERS`.
    ///
    /// A zero component is treated as unspecified.
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split('x')
            .map(|p| {
                p.parse::<u32>()
                    .map(|v| (v > 0).then_some(v))
                    .map_err(|_| VoxelError::InvalidShape(format!("invalid dimensions format: {s}")))
            })
            .collect::<Result<Vec<_>>>()?;

        match parts.as_slice() {
            [layers] => Ok(Self {
                layers: *layers,
                ..Default::default()
            }),
            [width, layers] => Ok(Self {
                width: *width,
                layers: *layers,
                ..Default::default()
            }),
            [width, height, layers] => Ok(Self {
                width: *width,
                height: *height,
                layers: *layers,
            }),
            _ => Err(VoxelError::InvalidShape(format!(
                "invalid dimensions format: {s}"
            ))),
        }
    }
}

/// Resolve a requested shape against the model bounding box.
///
/// Missing layers default to [`DEFAULT_LAYERS`]; a missing width follows the
/// X/Z aspect ratio, a missing height the X/Y ratio of the (unrounded)
/// width. Results are rounded and clamped to at least 1.
pub fn deduce_dimensions(requested: RequestedShape, bbox: &Aabb) -> Result<GridDim> {
    if bbox.is_degenerate() {
        return Err(VoxelError::DegenerateBounds);
    }
    let size = bbox.size();

    let layers = f64::from(requested.layers.unwrap_or(DEFAULT_LAYERS));
    let width = match requested.width {
        Some(w) => f64::from(w),
        None => layers / size.z * size.x,
    };
    let height = match requested.height {
        Some(h) => f64::from(h),
        None => width / size.x * size.y,
    };

    let resolve = |v: f64| v.round().max(1.0) as usize;
    GridDim::new(resolve(width), resolve(height), resolve(layers))
}

/// The two grid dimensions orthogonal to `axis`, lower axis first.
pub fn cross_section(dim: GridDim, axis: Axis) -> (usize, usize) {
    match axis {
        Axis::X => (dim.y, dim.z),
        Axis::Y => (dim.x, dim.z),
        Axis::Z => (dim.x, dim.y),
    }
}

/// Map a slice pixel `(u, v)` of `layer` on `axis` to a grid coordinate.
pub fn layer_position(axis: Axis, layer: usize, (u, v): (usize, usize)) -> [usize; 3] {
    match axis {
        Axis::X => [layer, u, v],
        Axis::Y => [u, layer, v],
        Axis::Z => [u, v, layer],
    }
}

/// Inverse of [`layer_position`]: split a grid coordinate into
/// `(layer, (u, v))` for `axis`.
pub fn slice_position(axis: Axis, pos: [usize; 3]) -> (usize, (usize, usize)) {
    let [x, y, z] = pos;
    match axis {
        Axis::X => (x, (y, z)),
        Axis::Y => (y, (x, z)),
        Axis::Z => (z, (x, y)),
    }
}

/// Orthographic viewing volume covering one voxel-thick slab.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionWindow {
    /// Left plane.
    pub left: f64,
    /// Right plane.
    pub right: f64,
    /// Bottom plane.
    pub bottom: f64,
    /// Top plane.
    pub top: f64,
    /// Near plane.
    pub near: f64,
    /// Far plane.
    pub far: f64,
    /// Model-to-eye orientation for the axis.
    pub base: Matrix4<f64>,
}

impl ProjectionWindow {
    /// Full model-to-clip transform.
    pub fn transform(&self) -> Transform {
        Transform::orthographic(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
        .then(&Transform::from_matrix(self.base))
    }
}

/// Projection for `layer` along `axis`.
///
/// The slab spans one layer step, widened by [`SLAB_EPSILON`] of a step on
/// both sides. X layers count up from `bbox.min.x`; Y and Z layers count down
/// from the maximum. [`SweepDirection::Back`] mirrors the depth range so the
/// renderer's greater-depth test keeps the opposite surface.
pub fn projection_window(
    dim: GridDim,
    axis: Axis,
    layer: usize,
    bbox: &Aabb,
    direction: SweepDirection,
) -> ProjectionWindow {
    let a = axis.index();
    let size = bbox.size();
    let step = size[a] / dim[axis] as f64;
    let layer = layer as f64;

    let (mut near, mut far) = match axis {
        Axis::X => (
            bbox.min[a] + step * (layer + 1.0),
            bbox.min[a] + step * layer,
        ),
        Axis::Y | Axis::Z => (
            bbox.max[a] - step * layer,
            bbox.max[a] - step * (layer + 1.0),
        ),
    };
    far -= step * SLAB_EPSILON;
    near += step * SLAB_EPSILON;

    let (left, right, bottom, top, base) = match axis {
        Axis::X => (
            bbox.max.y,
            bbox.min.y,
            bbox.max.z,
            bbox.min.z,
            Matrix4::new(
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                -1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        ),
        Axis::Y => (
            bbox.min.x,
            bbox.max.x,
            bbox.max.z,
            bbox.min.z,
            Matrix4::new(
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, -1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        ),
        Axis::Z => (
            bbox.min.x,
            bbox.max.x,
            bbox.max.y,
            bbox.min.y,
            Matrix4::new(
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, -1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        ),
    };

    if direction == SweepDirection::Back {
        std::mem::swap(&mut near, &mut far);
    }

    ProjectionWindow {
        left,
        right,
        bottom,
        top,
        near,
        far,
        base,
    }
}
