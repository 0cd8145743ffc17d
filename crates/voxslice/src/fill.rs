//! Interior fill: find the open space around the model, then grow colors
//! inward from the surface into every enclosed empty cell.
//!
//! Only the grid boundary seeds the outside region, so fully enclosed
//! cavities are filled like solid interior. A surface with holes lets the
//! outside leak in and leaves the interior unfilled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voxslice_math::{Color, Vec3};

use crate::error::VoxelError;
use crate::grid::{VoxelCell, VoxelGrid};

/// Which face neighbors contribute color when filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// No interior fill.
    #[default]
    None,
    /// The four neighbors in the XY plane.
    FlatPlus,
    /// All six face neighbors.
    VolumePlus,
    /// The two neighbors along X.
    FlatX,
    /// The two neighbors along Y.
    FlatY,
    /// The two neighbors along Z.
    FlatZ,
}

impl FillMode {
    /// Range into the `[-x, +x, -y, +y, +z, -z]` neighbor table.
    fn neighbor_range(self) -> std::ops::Range<usize> {
        match self {
            FillMode::None => 0..0,
            FillMode::FlatPlus => 0..4,
            FillMode::VolumePlus => 0..6,
            FillMode::FlatX => 0..2,
            FillMode::FlatY => 2..4,
            FillMode::FlatZ => 4..6,
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FillMode::None => "none",
            FillMode::FlatPlus => "flatplus",
            FillMode::VolumePlus => "volumeplus",
            FillMode::FlatX => "flatx",
            FillMode::FlatY => "flaty",
            FillMode::FlatZ => "flatz",
        };
        f.write_str(name)
    }
}

impl FromStr for FillMode {
    type Err = VoxelError;

    fn from_str(s: &str) -> Result<Self, VoxelError> {
        match s {
            "fn" | "none" => Ok(FillMode::None),
            "f+" | "flatplus" => Ok(FillMode::FlatPlus),
            "v+" | "volumeplus" => Ok(FillMode::VolumePlus),
            "fx" | "flatx" => Ok(FillMode::FlatX),
            "fy" | "flaty" => Ok(FillMode::FlatY),
            "fz" | "flatz" => Ok(FillMode::FlatZ),
            _ => Err(VoxelError::InvalidSettings(format!("unknown fill mode {s}"))),
        }
    }
}

/// Iteration counts from one fill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Outside-classification passes that marked at least one new cell.
    pub outside_passes: usize,
    /// Colorization iterations that filled at least one cell.
    pub fill_iterations: usize,
    /// Total cells filled.
    pub filled_cells: usize,
}

/// Fill enclosed empty cells of `grid` with colors grown from the surface.
///
/// `model_size` is the model bounding box extent; neighbor contributions are
/// weighted by `dim / model_size` per axis so non-cubic voxels blend
/// isotropically in model units.
pub fn fill_interior(grid: &mut VoxelGrid, model_size: Vec3, mode: FillMode) -> FillReport {
    let mut report = FillReport::default();
    let dim = grid.dim;
    if mode == FillMode::None || dim.x < 3 || dim.y < 3 || dim.z < 3 {
        return report;
    }

    let (dx, dxy) = (dim.x as isize, (dim.x * dim.y) as isize);
    let neighbors: [isize; 6] = [-1, 1, -dx, dx, dxy, -dxy];
    let weights = [
        (dim.x as f64 / model_size.x) as f32,
        (dim.y as f64 / model_size.y) as f32,
        (dim.z as f64 / model_size.z) as f32,
    ];
    let neighbor = |o: usize, i: usize| (o as isize + neighbors[i]) as usize;

    let interior = move || {
        (1..dim.z - 1).flat_map(move |z| {
            (1..dim.y - 1).flat_map(move |y| {
                (1..dim.x - 1).map(move |x| z * dim.x * dim.y + y * dim.x + x)
            })
        })
    };

    // Seed the boundary shell as outside.
    let mut outside = vec![false; dim.len()];
    for z in 0..dim.z {
        for y in 0..dim.y {
            for x in 0..dim.x {
                outside[z * dim.x * dim.y + y * dim.x + x] = x == 0
                    || x == dim.x - 1
                    || y == 0
                    || y == dim.y - 1
                    || z == 0
                    || z == dim.z - 1;
            }
        }
    }

    // Spread outside through empty cells; occupied cells touching it join
    // the shell but never pass it on to empty cells behind them.
    let cells = &mut grid.cells;
    loop {
        let mut marked = false;
        for o in interior() {
            if outside[o] {
                continue;
            }
            let reached = if cells[o].is_empty() {
                (0..6).any(|i| {
                    let n = neighbor(o, i);
                    outside[n] && cells[n].is_empty()
                })
            } else {
                (0..6).any(|i| outside[neighbor(o, i)])
            };
            if reached {
                outside[o] = true;
                marked = true;
            }
        }
        if !marked {
            break;
        }
        report.outside_passes += 1;
    }

    // Grow colors inward one cell layer per iteration.
    let mut snapshot: Vec<VoxelCell> = cells.clone();
    loop {
        snapshot.copy_from_slice(&cells[..]);
        let mut filled = 0;
        for o in interior() {
            if outside[o] || !cells[o].is_empty() {
                continue;
            }

            let mut sum = Color::zeros();
            let mut total = 0.0f32;
            for i in mode.neighbor_range() {
                let n = &snapshot[neighbor(o, i)];
                if !n.is_empty() {
                    let weight = weights[i / 2];
                    sum += n.color * weight;
                    total += weight;
                }
            }
            if total == 0.0 {
                continue;
            }

            let cell = &mut cells[o];
            cell.color = sum / total;
            cell.sample_count = 1;
            filled += 1;
        }
        if filled == 0 {
            break;
        }
        report.fill_iterations += 1;
        report.filled_cells += filled;
    }

    log::debug!(
        "fill {mode}: {} outside passes, {} iterations, {} cells filled",
        report.outside_passes,
        report.fill_iterations,
        report.filled_cells
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridDim;
    use approx::assert_relative_eq;

    /// Grid with a one-voxel-thick hollow shell spanning `[lo, hi]` on every axis.
    fn shell_grid(n: usize, lo: usize, hi: usize, color: Color) -> VoxelGrid {
        let mut grid = VoxelGrid::new(GridDim::new(n, n, n).unwrap());
        for z in lo..=hi {
            for y in lo..=hi {
                for x in lo..=hi {
                    let on_shell = [x, y, z].iter().any(|&c| c == lo || c == hi);
                    if on_shell {
                        grid[[x, y, z]].replace(color, 0);
                    }
                }
            }
        }
        grid
    }

    fn unit() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_fill_hollow_shell() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let mut grid = shell_grid(9, 1, 7, red);
        let before = grid.occupied_count();
        let report = fill_interior(&mut grid, unit(), FillMode::VolumePlus);

        // Interior of the shell is 5^3 cells.
        assert_eq!(report.filled_cells, 125);
        assert_eq!(grid.occupied_count(), before + 125);
        assert!(report.fill_iterations >= 3);
        let center = grid[[4, 4, 4]];
        assert_eq!(center.sample_count, 1);
        assert_relative_eq!(center.color[0], 1.0, epsilon = 1e-6);
        // Space outside the shell stays empty.
        assert!(grid[[0, 0, 0]].is_empty());
        assert!(grid[[8, 4, 4]].is_empty());
    }

    #[test]
    fn test_fill_idempotent() {
        let mut grid = shell_grid(8, 1, 6, Color::new(0.2, 0.4, 0.6, 1.0));
        fill_interior(&mut grid, unit(), FillMode::VolumePlus);
        let once = grid.cells().to_vec();

        let report = fill_interior(&mut grid, unit(), FillMode::VolumePlus);
        assert_eq!(report.filled_cells, 0);
        assert_eq!(grid.cells(), once.as_slice());
    }

    #[test]
    fn test_empty_grid_is_all_outside() {
        let dim = GridDim::new(7, 5, 6).unwrap();
        let mut grid = VoxelGrid::new(dim);
        let report = fill_interior(&mut grid, unit(), FillMode::VolumePlus);
        assert!(report.outside_passes <= dim.max() / 2);
        assert_eq!(report.filled_cells, 0);
        assert_eq!(report.fill_iterations, 0);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_leaky_shell_does_not_fill() {
        let mut grid = shell_grid(7, 1, 5, Color::new(1.0, 1.0, 1.0, 1.0));
        // Punch a hole through one wall.
        grid[[3, 3, 1]] = VoxelCell::default();
        let report = fill_interior(&mut grid, unit(), FillMode::VolumePlus);
        assert_eq!(report.filled_cells, 0);
    }

    #[test]
    fn test_flat_modes_use_axis_neighbors_only() {
        // Two walls perpendicular to X with different colors; the slab in
        // between is closed off in Y and Z by the shell.
        let white = Color::new(1.0, 1.0, 1.0, 1.0);
        let mut grid = shell_grid(5, 0, 4, white);
        for z in 0..5 {
            for y in 0..5 {
                grid[[0, y, z]].replace(Color::new(0.0, 0.0, 0.0, 1.0), 0);
            }
        }
        // Interior is x in 1..=3; FlatX grows from x=0 (black) and x=4 (white).
        let report = fill_interior(&mut grid, unit(), FillMode::FlatX);
        assert_eq!(report.filled_cells, 27);
        assert_relative_eq!(grid[[1, 2, 2]].color[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(grid[[3, 2, 2]].color[0], 1.0, epsilon = 1e-6);
        // The middle column averages one black and one white neighbor.
        assert_relative_eq!(grid[[2, 2, 2]].color[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_y_and_z_use_their_axis() {
        let black = Color::new(0.0, 0.0, 0.0, 1.0);
        let white = Color::new(1.0, 1.0, 1.0, 1.0);

        // Black wall at y = 0, everything else white.
        let mut grid = shell_grid(5, 0, 4, white);
        for z in 0..5 {
            for x in 0..5 {
                grid[[x, 0, z]].replace(black, 0);
            }
        }
        let report = fill_interior(&mut grid, unit(), FillMode::FlatY);
        assert_eq!(report.filled_cells, 27);
        assert_relative_eq!(grid[[2, 1, 2]].color[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(grid[[2, 3, 2]].color[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(grid[[2, 2, 2]].color[0], 0.5, epsilon = 1e-6);

        // Black wall at z = 0.
        let mut grid = shell_grid(5, 0, 4, white);
        for y in 0..5 {
            for x in 0..5 {
                grid[[x, y, 0]].replace(black, 0);
            }
        }
        let report = fill_interior(&mut grid, unit(), FillMode::FlatZ);
        assert_eq!(report.filled_cells, 27);
        assert_relative_eq!(grid[[2, 2, 1]].color[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(grid[[2, 2, 3]].color[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(grid[[1, 3, 2]].color[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_plus_ignores_z_neighbors() {
        // Green side walls, red floor and ceiling.
        let green = Color::new(0.0, 1.0, 0.0, 1.0);
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let mut grid = shell_grid(5, 0, 4, green);
        for y in 0..5 {
            for x in 0..5 {
                grid[[x, y, 0]].replace(red, 0);
                grid[[x, y, 4]].replace(red, 0);
            }
        }
        let mut volume = grid.clone();

        let report = fill_interior(&mut grid, unit(), FillMode::FlatPlus);
        assert_eq!(report.filled_cells, 27);
        for z in 1..4 {
            for y in 1..4 {
                for x in 1..4 {
                    let color = grid[[x, y, z]].color;
                    assert_relative_eq!(color[0], 0.0, epsilon = 1e-6);
                    assert_relative_eq!(color[1], 1.0, epsilon = 1e-6);
                }
            }
        }

        // With all six neighbors the floor bleeds in.
        fill_interior(&mut volume, unit(), FillMode::VolumePlus);
        assert_relative_eq!(volume[[2, 2, 1]].color[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_axis_weights_follow_voxel_size() {
        // Cell between a black X neighbor and a white Z neighbor. X voxels
        // are three times denser per model unit, so black dominates 3:1.
        let mut grid = VoxelGrid::new(GridDim::new(3, 3, 3).unwrap());
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    if [x, y, z] != [1, 1, 1] {
                        grid[[x, y, z]].replace(Color::new(0.5, 0.5, 0.5, 1.0), 0);
                    }
                }
            }
        }
        grid[[0, 1, 1]].replace(Color::new(0.0, 0.0, 0.0, 1.0), 0);
        grid[[2, 1, 1]].replace(Color::new(0.0, 0.0, 0.0, 1.0), 0);
        grid[[1, 1, 0]].replace(Color::new(1.0, 1.0, 1.0, 1.0), 0);
        grid[[1, 1, 2]].replace(Color::new(1.0, 1.0, 1.0, 1.0), 0);

        let size = Vec3::new(1.0, 3.0, 3.0);
        let report = fill_interior(&mut grid, size, FillMode::VolumePlus);
        assert_eq!(report.filled_cells, 1);
        // weights: x = 3, y = 1, z = 1
        // (2*3*0 + 2*1*0.5 + 2*1*1) / (6 + 2 + 2) = 3 / 10
        assert_relative_eq!(grid[[1, 1, 1]].color[0], 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_thin_grid_is_noop() {
        let mut grid = VoxelGrid::new(GridDim::new(2, 5, 5).unwrap());
        let report = fill_interior(&mut grid, unit(), FillMode::VolumePlus);
        assert_eq!(report, FillReport::default());
    }

    #[test]
    fn test_fill_mode_aliases() {
        assert_eq!("v+".parse::<FillMode>().unwrap(), FillMode::VolumePlus);
        assert_eq!("flatplus".parse::<FillMode>().unwrap(), FillMode::FlatPlus);
        assert_eq!("fz".parse::<FillMode>().unwrap(), FillMode::FlatZ);
        assert_eq!("fn".parse::<FillMode>().unwrap(), FillMode::None);
        assert!("solid".parse::<FillMode>().is_err());
    }
}
