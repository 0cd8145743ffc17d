#![warn(missing_docs)]

//! Math types for voxslice.
//!
//! Thin wrappers around nalgebra: points, vectors, RGBA colors, axis-aligned
//! bounding boxes, and the 4x4 transforms used to build orthographic slab
//! projections.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D model space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Homogeneous clip-space coordinates.
pub type Vec4 = Vector4<f64>;

/// Linear RGBA color with components in `[0, 1]`.
pub type Color = Vector4<f32>;

/// Axis-aligned bounding box in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Box spanning two corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self::new(first, first);
        for p in iter {
            bb.min = bb.min.inf(&p);
            bb.max = bb.max.sup(&p);
        }
        Some(bb)
    }

    /// Extent along each axis (`max - min`).
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True if any axis has zero (or negative, or non-finite) extent.
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        size.iter().any(|s| !(s.is_finite() && *s > 0.0))
    }
}

/// A 4x4 projective transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Wrap an existing matrix.
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Right-handed orthographic projection onto NDC `[-1, 1]^3`.
    ///
    /// Same convention as OpenGL's `glOrtho`: the eye looks down `-z`, and
    /// `near`/`far` are distances along that direction. Either pair of planes
    /// may be given reversed, which mirrors that axis.
    pub fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = 2.0 / (right - left);
        m[(1, 1)] = 2.0 / (top - bottom);
        m[(2, 2)] = -2.0 / (far - near);
        m[(0, 3)] = -(right + left) / (right - left);
        m[(1, 3)] = -(top + bottom) / (top - bottom);
        m[(2, 3)] = -(far + near) / (far - near);
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point into homogeneous clip coordinates.
    pub fn project(&self, p: &Point3) -> Vec4 {
        self.matrix * Vec4::new(p.x, p.y, p.z, 1.0)
    }
}
