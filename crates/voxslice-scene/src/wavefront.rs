//! Wavefront OBJ + MTL loading.
//!
//! Models are converted from the Y-up OBJ convention to the Z-up grid by
//! swapping Y and Z; winding is left untouched. Texture V is flipped so row
//! 0 of every texture is its top row.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use obj::{IndexTuple, Obj, ObjData, ObjMaterial};
use voxslice::{Material, Mesh, Scene, VoxelError};

use crate::error::{Result, SceneError};
use crate::texture::TextureCache;

/// Load an OBJ model, its material libraries and diffuse textures.
///
/// Each OBJ group becomes one mesh. Polygons are fan-triangulated and
/// vertices are shared per (position, texture coordinate) pair.
///
/// # Errors
///
/// Fails if the model or a material library cannot be parsed, a referenced
/// texture cannot be decoded, or the geometry is empty or flat.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene> {
    let path = path.as_ref();
    let mut model = Obj::load(path).map_err(|e| SceneError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    model.load_mtls().map_err(|e| SceneError::Material {
        path: path.to_path_buf(),
        message: e
            .0
            .iter()
            .map(|(lib, err)| format!("{lib}: {err}"))
            .collect::<Vec<_>>()
            .join("; "),
    })?;

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut materials = MaterialTable::new(base_dir);
    let mut meshes = Vec::new();

    for object in &model.data.objects {
        for group in &object.groups {
            if group.polys.is_empty() {
                log::debug!("skipping empty group {}/{}", object.name, group.name);
                continue;
            }
            let material = materials.resolve(group.material.as_ref())?;
            let mut builder = MeshBuilder::new(&model.data, meshes.len());
            for poly in &group.polys {
                builder.add_polygon(&poly.0)?;
            }
            meshes.push(builder.finish(material));
        }
    }

    let (materials, textures) = materials.finish();
    log::info!(
        "loaded {}: {} meshes, {} materials, {} textures",
        path.display(),
        meshes.len(),
        materials.len(),
        textures.len()
    );
    Ok(Scene::new(meshes, materials, textures)?)
}

/// Scene materials keyed by MTL name, plus the textures they use.
struct MaterialTable {
    base_dir: PathBuf,
    materials: Vec<Material>,
    by_name: HashMap<String, usize>,
    default: Option<usize>,
    textures: TextureCache,
}

impl MaterialTable {
    fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            materials: Vec::new(),
            by_name: HashMap::new(),
            default: None,
            textures: TextureCache::default(),
        }
    }

    fn resolve(&mut self, material: Option<&ObjMaterial>) -> Result<usize> {
        let mtl = match material {
            Some(ObjMaterial::Mtl(mtl)) => mtl,
            Some(ObjMaterial::Ref(name)) => {
                log::warn!("material {name} not found in any material library");
                return Ok(self.default_material());
            }
            None => return Ok(self.default_material()),
        };
        if let Some(&index) = self.by_name.get(&mtl.name) {
            return Ok(index);
        }

        let mut material = Material::default();
        if let Some([r, g, b]) = mtl.kd {
            material.color = [r, g, b, 1.0];
        }
        match mtl.map_kd.as_deref().map(str::trim) {
            Some("") => log::warn!(
                "material {} has an empty diffuse texture path, a texture will be missing",
                mtl.name
            ),
            Some(file) => {
                let texture_path = self.base_dir.join(file);
                material.texture = Some(self.textures.get_or_load(&texture_path)?);
            }
            None => {}
        }

        let index = self.materials.len();
        self.materials.push(material);
        self.by_name.insert(mtl.name.clone(), index);
        Ok(index)
    }

    fn default_material(&mut self) -> usize {
        *self.default.get_or_insert_with(|| {
            self.materials.push(Material::default());
            self.materials.len() - 1
        })
    }

    fn finish(self) -> (Vec<Material>, Vec<voxslice::Texture>) {
        (self.materials, self.textures.into_textures())
    }
}

/// Accumulates one group's triangles with deduplicated vertices.
struct MeshBuilder<'a> {
    data: &'a ObjData,
    mesh_index: usize,
    vertices: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    has_texcoords: bool,
    lookup: HashMap<(usize, Option<usize>), u32>,
}

impl<'a> MeshBuilder<'a> {
    fn new(data: &'a ObjData, mesh_index: usize) -> Self {
        Self {
            data,
            mesh_index,
            vertices: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            has_texcoords: false,
            lookup: HashMap::new(),
        }
    }

    fn add_polygon(&mut self, corners: &[IndexTuple]) -> Result<()> {
        if corners.len() < 3 {
            return Ok(());
        }
        let first = self.vertex(&corners[0])?;
        let mut prev = self.vertex(&corners[1])?;
        for corner in &corners[2..] {
            let next = self.vertex(corner)?;
            self.indices.extend_from_slice(&[first, prev, next]);
            prev = next;
        }
        Ok(())
    }

    fn vertex(&mut self, corner: &IndexTuple) -> Result<u32> {
        let (pos, tex) = (corner.0, corner.1);
        let data = self.data;
        if let Some(&index) = self.lookup.get(&(pos, tex)) {
            return Ok(index);
        }

        let [x, y, z] = *data.position.get(pos).ok_or_else(|| {
            self.malformed(format!("position index {pos} out of range"))
        })?;
        let [u, v] = match tex {
            Some(t) => {
                let [u, v] = *data.texture.get(t).ok_or_else(|| {
                    self.malformed(format!("texture coordinate index {t} out of range"))
                })?;
                self.has_texcoords = true;
                [u, 1.0 - v]
            }
            None => [0.0, 0.0],
        };

        let index = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(&[x, z, y]);
        self.uvs.extend_from_slice(&[u, v]);
        self.lookup.insert((pos, tex), index);
        Ok(index)
    }

    fn malformed(&self, message: String) -> SceneError {
        VoxelError::MalformedMesh(self.mesh_index, message).into()
    }

    fn finish(self, material: usize) -> Mesh {
        Mesh {
            vertices: self.vertices,
            uvs: if self.has_texcoords { self.uvs } else { Vec::new() },
            indices: self.indices,
            material,
        }
    }
}
