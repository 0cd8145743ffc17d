#![warn(missing_docs)]

//! CPU software renderer for voxslice.
//!
//! Implements [`voxslice::Renderer`] with an edge-function rasterizer:
//! orthographic projection, face culling, a "keep the greatest depth" test,
//! flat or textured shading with nearest, bilinear or trilinear mipmapped
//! filtering, and a pass that reports the sampled mip level.
//!
//! # Example
//!
//! ```ignore
//! use voxslice_raster::{surface_for, SoftwareRenderer};
//!
//! let dim = voxslice::deduce_dimensions(shape, scene.bounds())?;
//! let mut renderer = SoftwareRenderer::new(&scene, surface_for(dim))?;
//! let result = voxslice::voxelize(&scene, &mut renderer, &settings)?;
//! ```

pub mod error;
mod raster;
mod sampler;

pub use error::{RasterError, Result};
pub use sampler::MipChain;

use voxslice::{DrawMode, FrameMut, GridDim, RenderError, RenderRequest, Renderer, Scene};

use raster::{is_culled, rasterize_triangle, signed_area, texture_lod, to_screen, ScreenVertex};

/// Largest supported surface side, in pixels.
pub const MAX_SURFACE_SIDE: usize = 16384;

/// Surface large enough for every cross-section of a `dim` grid.
pub fn surface_for(dim: GridDim) -> (usize, usize) {
    // Cross-sections are (y, z), (x, z) and (x, y).
    (dim.x.max(dim.y), dim.y.max(dim.z))
}

/// Software implementation of [`Renderer`].
///
/// Holds the depth buffer and the mip chains of the scene it was created
/// for; rendering a different scene falls back to flat color for textures
/// it does not know.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    width: usize,
    height: usize,
    depth: Vec<f64>,
    mips: Vec<MipChain>,
    projected: Vec<ScreenVertex>,
}

impl SoftwareRenderer {
    /// Prepare a renderer for `scene` with a `(width, height)` surface.
    pub fn new(scene: &Scene, (width, height): (usize, usize)) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidSurface { width, height });
        }
        if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
            return Err(RasterError::SurfaceTooLarge {
                width,
                height,
                max: MAX_SURFACE_SIDE,
            });
        }

        let mips = scene
            .textures
            .iter()
            .enumerate()
            .map(|(i, texture)| MipChain::new(i, texture))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "software renderer {width}x{height}, {} textures",
            mips.len()
        );

        Ok(Self {
            width,
            height,
            depth: vec![-1.0; width * height],
            mips,
            projected: Vec::new(),
        })
    }

    /// Surface size.
    pub fn surface(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl Renderer for SoftwareRenderer {
    fn render(
        &mut self,
        scene: &Scene,
        request: &RenderRequest,
        frame: FrameMut<'_>,
    ) -> std::result::Result<(), RenderError> {
        let (w, h) = (request.width, request.height);
        if w > self.width || h > self.height {
            return Err(RenderError::Backend(format!(
                "viewport {w}x{h} exceeds the {}x{} surface",
                self.width, self.height
            )));
        }
        if frame.width != w || frame.height != h {
            return Err(RenderError::Backend(format!(
                "frame {}x{} does not match viewport {w}x{h}",
                frame.width, frame.height
            )));
        }

        let Self {
            depth,
            mips,
            projected,
            ..
        } = self;
        let depth = &mut depth[..w * h];
        depth.fill(-1.0);
        frame.color.fill(0);
        frame.coverage.fill(0);

        for mesh in &scene.meshes {
            let material = scene.material(mesh);
            let chain = material
                .texture
                .filter(|_| mesh.has_uvs())
                .and_then(|i| mips.get(i));
            if request.mode == DrawMode::MipLevel && chain.is_none() {
                continue;
            }
            let flat = material.color.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8);

            projected.clear();
            projected.extend(
                (0..mesh.num_vertices())
                    .map(|i| to_screen(request.transform.project(&mesh.position(i)), w, h)),
            );

            for tri in mesh.indices.chunks_exact(3) {
                let idx = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                let v = idx.map(|i| projected[i]);
                if is_culled(signed_area(&v), request.cull) {
                    continue;
                }

                let textured = chain.map(|chain| {
                    let uv = idx.map(|i| mesh.uv(i).map(f64::from));
                    (chain, uv, texture_lod(&v, &uv, chain.base_size()))
                });

                rasterize_triangle(&v, w, h, |px, py, l| {
                    let z = l[0] * v[0].z + l[1] * v[1].z + l[2] * v[2].z;
                    if !(-1.0..=1.0).contains(&z) {
                        return;
                    }
                    let o = py * w + px;
                    if z < depth[o] {
                        return;
                    }
                    depth[o] = z;

                    let rgba = match (request.mode, &textured) {
                        (DrawMode::MipLevel, Some((_, _, lod))) => {
                            [lod.clamp(0.0, 255.0).round() as u8, 0, 0, 0]
                        }
                        (DrawMode::Shaded, Some((chain, uv, lod))) => {
                            let at = [0, 1]
                                .map(|k| l[0] * uv[0][k] + l[1] * uv[1][k] + l[2] * uv[2][k]);
                            chain.sample(at, *lod, request.filter)
                        }
                        _ => flat,
                    };
                    frame.color[o * 4..o * 4 + 4].copy_from_slice(&rgba);
                    frame.coverage[o] = 1;
                });
            }
        }
        Ok(())
    }
}
