//! Scene data handed from a loader to the voxelizer and renderer.

use voxslice_math::{Aabb, Point3};

use crate::error::{Result, VoxelError};

/// Triangle geometry with one material.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, ...]`.
    pub vertices: Vec<f32>,
    /// Flat array of texture coordinates `[u0, v0, u1, ...]`, or empty.
    /// `v = 0` addresses the top row of the texture.
    pub uvs: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
    /// Index into [`Scene::materials`].
    pub material: usize,
}

impl Mesh {
    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// True when every vertex carries a texture coordinate.
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty() && self.uvs.len() / 2 == self.num_vertices()
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> Point3 {
        Point3::new(
            f64::from(self.vertices[i * 3]),
            f64::from(self.vertices[i * 3 + 1]),
            f64::from(self.vertices[i * 3 + 2]),
        )
    }

    /// Texture coordinate of vertex `i`.
    pub fn uv(&self, i: usize) -> [f32; 2] {
        [self.uvs[i * 2], self.uvs[i * 2 + 1]]
    }
}

/// Surface appearance: flat color, optionally replaced by a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// RGBA diffuse color.
    pub color: [f32; 4],
    /// Index into [`Scene::textures`].
    pub texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [0.6, 0.6, 0.6, 1.0],
            texture: None,
        }
    }
}

/// RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

/// A loaded model: meshes, their materials and textures, and bounds.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Draw list.
    pub meshes: Vec<Mesh>,
    /// Materials referenced by meshes.
    pub materials: Vec<Material>,
    /// Textures referenced by materials.
    pub textures: Vec<Texture>,
    bounds: Aabb,
}

impl Scene {
    /// Build a scene, validating geometry and computing its bounding box.
    ///
    /// Fails if there are no meshes, a mesh has no faces or positions, or the
    /// bounding box is flat along any axis.
    pub fn new(meshes: Vec<Mesh>, materials: Vec<Material>, textures: Vec<Texture>) -> Result<Self> {
        if meshes.is_empty() {
            return Err(VoxelError::EmptyScene);
        }
        for (i, mesh) in meshes.iter().enumerate() {
            if mesh.num_triangles() == 0 || mesh.num_vertices() == 0 {
                return Err(VoxelError::EmptyMesh(i));
            }
            let n = mesh.num_vertices() as u32;
            if mesh.indices.iter().any(|&idx| idx >= n) {
                return Err(VoxelError::MalformedMesh(
                    i,
                    format!("index past its {n} vertices"),
                ));
            }
        }

        let bounds = Aabb::from_points(
            meshes
                .iter()
                .flat_map(|m| (0..m.num_vertices()).map(move |i| m.position(i))),
        )
        .ok_or(VoxelError::EmptyScene)?;
        if bounds.is_degenerate() {
            return Err(VoxelError::DegenerateBounds);
        }

        Ok(Self {
            meshes,
            materials,
            textures,
            bounds,
        })
    }

    /// Model-space bounding box.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Material of `mesh`, falling back to the default when out of range.
    pub fn material(&self, mesh: &Mesh) -> Material {
        self.materials.get(mesh.material).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Closed axis-aligned box from `min` to `max`, outward-facing CCW triangles.
    pub(crate) fn make_box_mesh(min: [f32; 3], max: [f32; 3]) -> Mesh {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        let vertices = vec![
            x0, y0, z0, x1, y0, z0, x1, y1, z0, x0, y1, z0, //
            x0, y0, z1, x1, y0, z1, x1, y1, z1, x0, y1, z1,
        ];
        let indices = vec![
            0, 2, 1, 0, 3, 2, // bottom
            4, 5, 6, 4, 6, 7, // top
            0, 1, 5, 0, 5, 4, // front
            2, 3, 7, 2, 7, 6, // back
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        Mesh {
            vertices,
            uvs: Vec::new(),
            indices,
            material: 0,
        }
    }

    #[test]
    fn test_scene_bounds() {
        let scene = Scene::new(
            vec![make_box_mesh([0.0, 0.0, 0.0], [2.0, 1.0, 4.0])],
            vec![Material::default()],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(scene.bounds().size(), voxslice_math::Vec3::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn test_scene_rejects_empty() {
        assert!(matches!(
            Scene::new(Vec::new(), Vec::new(), Vec::new()),
            Err(VoxelError::EmptyScene)
        ));
        assert!(matches!(
            Scene::new(vec![Mesh::default()], Vec::new(), Vec::new()),
            Err(VoxelError::EmptyMesh(0))
        ));
    }

    #[test]
    fn test_scene_rejects_flat_model() {
        let mesh = Mesh {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            uvs: Vec::new(),
            indices: vec![0, 1, 2],
            material: 0,
        };
        assert!(matches!(
            Scene::new(vec![mesh], Vec::new(), Vec::new()),
            Err(VoxelError::DegenerateBounds)
        ));
    }

    #[test]
    fn test_material_fallback() {
        let scene = Scene::new(
            vec![make_box_mesh([0.0; 3], [1.0; 3])],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(scene.material(&scene.meshes[0]), Material::default());
    }
}
