//! Texture mip chains and filtered sampling. Addressing wraps (repeat).

use image::imageops::{self, FilterType};
use image::RgbaImage;
use voxslice::{Interpolation, Texture};

use crate::error::{RasterError, Result};

/// A texture and its successively halved levels, down to 1x1.
#[derive(Debug, Clone)]
pub struct MipChain {
    levels: Vec<RgbaImage>,
}

impl MipChain {
    /// Build the chain for scene texture `index`.
    pub fn new(index: usize, texture: &Texture) -> Result<Self> {
        let base = RgbaImage::from_raw(texture.width, texture.height, texture.pixels.clone())
            .filter(|img| img.width() > 0 && img.height() > 0)
            .ok_or_else(|| RasterError::MalformedTexture {
                index,
                message: format!(
                    "{} bytes for {}x{} RGBA8",
                    texture.pixels.len(),
                    texture.width,
                    texture.height
                ),
            })?;

        let mut levels = vec![base];
        loop {
            let prev = &levels[levels.len() - 1];
            let (w, h) = prev.dimensions();
            if w == 1 && h == 1 {
                break;
            }
            let next = imageops::resize(prev, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Number of levels, base included.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Base level size in texels.
    pub fn base_size(&self) -> (u32, u32) {
        self.levels[0].dimensions()
    }

    /// Sample at `uv` (v = 0 is the top row) with level of detail `lod`.
    pub fn sample(&self, uv: [f64; 2], lod: f64, filter: Interpolation) -> [u8; 4] {
        let rgba = match filter {
            Interpolation::Nearest => nearest(&self.levels[0], uv),
            Interpolation::Linear => bilinear(&self.levels[0], uv),
            Interpolation::Mipmap => self.trilinear(uv, lod),
        };
        rgba.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }

    fn trilinear(&self, uv: [f64; 2], lod: f64) -> [f64; 4] {
        // NaN also lands here.
        if !(lod > 0.0) {
            return bilinear(&self.levels[0], uv);
        }
        let last = (self.levels.len() - 1) as f64;
        let lod = lod.min(last);
        let lo = lod.floor();
        let t = lod - lo;
        let a = bilinear(&self.levels[lo as usize], uv);
        if t == 0.0 {
            return a;
        }
        let b = bilinear(&self.levels[lo as usize + 1], uv);
        [0, 1, 2, 3].map(|i| a[i] + (b[i] - a[i]) * t)
    }
}

fn texel(level: &RgbaImage, x: i64, y: i64) -> [f64; 4] {
    let (w, h) = level.dimensions();
    let x = x.rem_euclid(i64::from(w)) as u32;
    let y = y.rem_euclid(i64::from(h)) as u32;
    level.get_pixel(x, y).0.map(f64::from)
}

fn nearest(level: &RgbaImage, [u, v]: [f64; 2]) -> [f64; 4] {
    let (w, h) = level.dimensions();
    let x = (u * f64::from(w)).floor() as i64;
    let y = (v * f64::from(h)).floor() as i64;
    texel(level, x, y)
}

fn bilinear(level: &RgbaImage, [u, v]: [f64; 2]) -> [f64; 4] {
    let (w, h) = level.dimensions();
    let x = u * f64::from(w) - 0.5;
    let y = v * f64::from(h) - 0.5;
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let c00 = texel(level, x0, y0);
    let c10 = texel(level, x0 + 1, y0);
    let c01 = texel(level, x0, y0 + 1);
    let c11 = texel(level, x0 + 1, y0 + 1);
    [0, 1, 2, 3].map(|i| {
        let top = c00[i] + (c10[i] - c00[i]) * fx;
        let bottom = c01[i] + (c11[i] - c01[i]) * fx;
        top + (bottom - top) * fy
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(width: u32, height: u32, texels: &[[u8; 4]]) -> Texture {
        Texture {
            width,
            height,
            pixels: texels.iter().flatten().copied().collect(),
        }
    }

    #[test]
    fn test_chain_halves_to_one_texel() {
        let tex = texture(4, 2, &[[0, 0, 0, 255]; 8]);
        let chain = MipChain::new(0, &tex).unwrap();
        assert_eq!(chain.level_count(), 3);
        assert_eq!(chain.base_size(), (4, 2));
        assert_eq!(chain.levels[1].dimensions(), (2, 1));
        assert_eq!(chain.levels[2].dimensions(), (1, 1));
    }

    #[test]
    fn test_malformed_texture_rejected() {
        let tex = Texture {
            width: 2,
            height: 2,
            pixels: vec![0; 7],
        };
        assert!(matches!(
            MipChain::new(3, &tex),
            Err(RasterError::MalformedTexture { index: 3, .. })
        ));
        let empty = Texture {
            width: 0,
            height: 4,
            pixels: Vec::new(),
        };
        assert!(MipChain::new(0, &empty).is_err());
    }

    #[test]
    fn test_nearest_wraps() {
        let tex = texture(2, 1, &[[10, 0, 0, 255], [200, 0, 0, 255]]);
        let chain = MipChain::new(0, &tex).unwrap();
        assert_eq!(chain.sample([0.25, 0.5], 0.0, Interpolation::Nearest)[0], 10);
        assert_eq!(chain.sample([0.75, 0.5], 0.0, Interpolation::Nearest)[0], 200);
        assert_eq!(chain.sample([1.25, 0.5], 0.0, Interpolation::Nearest)[0], 10);
        assert_eq!(chain.sample([-0.25, 0.5], 0.0, Interpolation::Nearest)[0], 200);
    }

    #[test]
    fn test_bilinear_blends_neighbors() {
        let tex = texture(2, 1, &[[0, 0, 0, 255], [255, 255, 255, 255]]);
        let chain = MipChain::new(0, &tex).unwrap();
        // Halfway between the two texel centers.
        assert_eq!(chain.sample([0.5, 0.5], 0.0, Interpolation::Linear), [128, 128, 128, 255]);
        // Texel center reads back exactly.
        assert_eq!(chain.sample([0.25, 0.5], 0.0, Interpolation::Linear)[0], 0);
    }

    #[test]
    fn test_mipmap_uses_coarse_level_when_minified() {
        // Uniform texture: every level has the same color.
        let tex = texture(4, 4, &[[40, 80, 120, 255]; 16]);
        let chain = MipChain::new(0, &tex).unwrap();
        for lod in [0.0, 0.5, 1.0, 1.7, 2.0, 9.0] {
            assert_eq!(
                chain.sample([0.3, 0.6], lod, Interpolation::Mipmap),
                [40, 80, 120, 255]
            );
        }
        assert_eq!(
            chain.sample([0.3, 0.6], f64::NAN, Interpolation::Mipmap),
            [40, 80, 120, 255]
        );
    }
}
