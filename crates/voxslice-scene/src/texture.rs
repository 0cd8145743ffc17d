//! Diffuse texture loading, shared by path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use voxslice::Texture;

use crate::error::{Result, SceneError};

/// Decode an image file into an RGBA8 [`Texture`].
pub fn load_texture(path: &Path) -> Result<Texture> {
    let image = image::open(path)
        .map_err(|source| SceneError::Texture {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    log::debug!("loaded texture {} ({width}x{height})", path.display());
    Ok(Texture {
        width,
        height,
        pixels: image.into_raw(),
    })
}

/// Textures loaded so far, so materials referencing the same file share one
/// entry.
#[derive(Debug, Default)]
pub(crate) struct TextureCache {
    textures: Vec<Texture>,
    by_path: HashMap<PathBuf, usize>,
}

impl TextureCache {
    /// Index of the texture at `path`, loading it on first use.
    pub(crate) fn get_or_load(&mut self, path: &Path) -> Result<usize> {
        if let Some(&index) = self.by_path.get(path) {
            return Ok(index);
        }
        let texture = load_texture(path)?;
        let index = self.textures.len();
        self.textures.push(texture);
        self.by_path.insert(path.to_path_buf(), index);
        Ok(index)
    }

    pub(crate) fn into_textures(self) -> Vec<Texture> {
        self.textures
    }
}
