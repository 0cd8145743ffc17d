//! Triangle setup and coverage.
//!
//! Screen space follows GL window conventions: x grows right, y grows up,
//! row 0 is NDC y = -1 and pixels are sampled at their centers.

use voxslice::CullMode;
use voxslice_math::Vec4;

/// A vertex after projection: pixel position and NDC depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScreenVertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Map clip coordinates to a `width` x `height` viewport.
pub(crate) fn to_screen(clip: Vec4, width: usize, height: usize) -> ScreenVertex {
    let w = if clip.w == 0.0 { 1.0 } else { clip.w };
    ScreenVertex {
        x: (clip.x / w + 1.0) * 0.5 * width as f64,
        y: (clip.y / w + 1.0) * 0.5 * height as f64,
        z: clip.z / w,
    }
}

fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f64, py: f64) -> f64 {
    (b.x - a.x) * (py - a.y) - (px - a.x) * (b.y - a.y)
}

/// Twice the signed area; positive for counter-clockwise (front) triangles.
pub(crate) fn signed_area(v: &[ScreenVertex; 3]) -> f64 {
    edge(&v[0], &v[1], v[2].x, v[2].y)
}

/// Whether a triangle with `area` is discarded under `cull`.
pub(crate) fn is_culled(area: f64, cull: CullMode) -> bool {
    match cull {
        CullMode::None => false,
        CullMode::Back => area < 0.0,
        CullMode::Front => area > 0.0,
    }
}

/// Call `emit(x, y, barycentrics)` for every pixel whose center lies inside
/// the triangle. Degenerate triangles cover nothing.
pub(crate) fn rasterize_triangle<F>(v: &[ScreenVertex; 3], width: usize, height: usize, mut emit: F)
where
    F: FnMut(usize, usize, [f64; 3]),
{
    let area = signed_area(v);
    if area == 0.0 || !area.is_finite() {
        return;
    }

    let min_x = v[0].x.min(v[1].x).min(v[2].x);
    let max_x = v[0].x.max(v[1].x).max(v[2].x);
    let min_y = v[0].y.min(v[1].y).min(v[2].y);
    let max_y = v[0].y.max(v[1].y).max(v[2].y);

    let x0 = (min_x - 0.5).ceil().max(0.0);
    let x1 = (max_x - 0.5).floor().min(width as f64 - 1.0);
    let y0 = (min_y - 0.5).ceil().max(0.0);
    let y1 = (max_y - 0.5).floor().min(height as f64 - 1.0);
    if x0 > x1 || y0 > y1 {
        return;
    }

    for py in y0 as usize..=y1 as usize {
        let cy = py as f64 + 0.5;
        for px in x0 as usize..=x1 as usize {
            let cx = px as f64 + 0.5;
            let l0 = edge(&v[1], &v[2], cx, cy) / area;
            let l1 = edge(&v[2], &v[0], cx, cy) / area;
            let l2 = edge(&v[0], &v[1], cx, cy) / area;
            if l0 >= 0.0 && l1 >= 0.0 && l2 >= 0.0 {
                emit(px, py, [l0, l1, l2]);
            }
        }
    }
}

/// Level of detail for a texture of `size` texels mapped with `uv` onto `v`.
///
/// Under orthographic projection the UV derivatives are constant across the
/// triangle, so this is `log2` of the larger texel footprint of one pixel
/// step in x or y. Returns negative values when magnifying.
pub(crate) fn texture_lod(v: &[ScreenVertex; 3], uv: &[[f64; 2]; 3], size: (u32, u32)) -> f64 {
    let (tw, th) = (f64::from(size.0), f64::from(size.1));
    let (dx1, dy1) = (v[1].x - v[0].x, v[1].y - v[0].y);
    let (dx2, dy2) = (v[2].x - v[0].x, v[2].y - v[0].y);
    let denom = dx1 * dy2 - dx2 * dy1;
    if denom == 0.0 {
        return 0.0;
    }

    let (du1, du2) = ((uv[1][0] - uv[0][0]) * tw, (uv[2][0] - uv[0][0]) * tw);
    let (dv1, dv2) = ((uv[1][1] - uv[0][1]) * th, (uv[2][1] - uv[0][1]) * th);

    let dudx = (du1 * dy2 - du2 * dy1) / denom;
    let dudy = (du2 * dx1 - du1 * dx2) / denom;
    let dvdx = (dv1 * dy2 - dv2 * dy1) / denom;
    let dvdy = (dv2 * dx1 - dv1 * dx2) / denom;

    let rho = dudx.hypot(dvdx).max(dudy.hypot(dvdy));
    rho.log2()
}
