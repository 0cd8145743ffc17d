//! End-to-end runs through the software renderer and PNG output.

use std::fs;
use std::path::Path;

use clap::Parser;
use voxslice::{
    export_slices, voxelize, FillMode, Interpolation, Material, Mesh, RequestedShape, Scene,
    VoxelizeSettings,
};
use voxslice_cli::{run, Cli, PngWriter};
use voxslice_raster::{surface_for, SoftwareRenderer};

fn box_mesh(min: f32, max: f32) -> Mesh {
    let (a, b) = (min, max);
    let vertices = vec![
        a, a, a, b, a, a, b, b, a, a, b, a, //
        a, a, b, b, a, b, b, b, b, a, b, b,
    ];
    let indices = vec![
        0, 2, 1, 0, 3, 2, //
        4, 5, 6, 4, 6, 7, //
        0, 1, 5, 0, 5, 4, //
        2, 3, 7, 2, 7, 6, //
        0, 4, 7, 0, 7, 3, //
        1, 2, 6, 1, 6, 5,
    ];
    Mesh {
        vertices,
        uvs: Vec::new(),
        indices,
        material: 0,
    }
}

/// Sub-pixel triangle that only widens the bounds.
fn anchor(at: f32, toward: f32) -> Mesh {
    Mesh {
        vertices: vec![at, at, at, toward, at, at, at, toward, at],
        uvs: Vec::new(),
        indices: vec![0, 1, 2],
        material: 0,
    }
}

/// A box spanning cells 1..=4 of a 6x6x6 grid over a 6-unit cube.
fn boxed_scene() -> Scene {
    Scene::new(
        vec![box_mesh(1.25, 4.75), anchor(0.0, 0.1), anchor(6.0, 5.9)],
        vec![Material::default()],
        Vec::new(),
    )
    .unwrap()
}

fn opaque_pixels(path: &Path) -> Vec<[u8; 4]> {
    image::open(path)
        .unwrap()
        .to_rgba8()
        .pixels()
        .filter(|p| p.0[3] > 0)
        .map(|p| p.0)
        .collect()
}

#[test]
fn test_box_is_shelled_then_filled() {
    let scene = boxed_scene();
    let settings = VoxelizeSettings {
        shape: "6x6x6".parse::<RequestedShape>().unwrap(),
        interpolation: Interpolation::Linear,
        fill: FillMode::VolumePlus,
        ..Default::default()
    };
    let dim = voxslice::deduce_dimensions(settings.shape, scene.bounds()).unwrap();
    let mut renderer = SoftwareRenderer::new(&scene, surface_for(dim)).unwrap();
    let result = voxelize(&scene, &mut renderer, &settings).unwrap();

    assert_eq!(result.stats.dim.to_string(), "6x6x6");
    // Shell of a 4x4x4 block.
    assert_eq!(result.stats.surface_cells, 64 - 8);
    assert_eq!(result.grid.occupied_count(), 64);
    assert!(result.grid[[0, 0, 0]].is_empty());
    assert!(!result.grid[[3, 3, 3]].is_empty());
    assert!(!result.grid[[1, 4, 2]].is_empty());
    assert!(result.grid[[5, 3, 3]].is_empty());

    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("layer_");
    let files = export_slices(
        &result.grid,
        settings.export_axis,
        prefix.to_str().unwrap(),
        false,
        &mut PngWriter,
    )
    .unwrap();
    assert_eq!(files.len(), 6);
    assert_eq!(files[2], dir.path().join("layer_2.png"));

    assert!(opaque_pixels(&files[0]).is_empty());
    let middle = opaque_pixels(&files[2]);
    assert_eq!(middle.len(), 16);
    assert!(middle.iter().all(|p| *p == [153, 153, 153, 255]));
}

const BOXED_OBJ: &str = "\
# box with two corner anchors
v 1.25 1.25 1.25
v 4.75 1.25 1.25
v 4.75 4.75 1.25
v 1.25 4.75 1.25
v 1.25 1.25 4.75
v 4.75 1.25 4.75
v 4.75 4.75 4.75
v 1.25 4.75 4.75
v 0 0 0
v 0.1 0 0
v 0 0.1 0
v 6 6 6
v 5.9 6 6
v 6 5.9 6
f 1 3 2
f 1 4 3
f 5 6 7
f 5 7 8
f 1 2 6
f 1 6 5
f 3 4 8
f 3 8 7
f 1 5 8
f 1 8 4
f 2 3 7
f 2 7 6
f 9 10 11
f 12 13 14
";

#[test]
fn test_run_writes_stacked_png() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("box.obj");
    fs::write(&model, BOXED_OBJ).unwrap();
    let prefix = dir.path().join("stack_");

    let cli = Cli::try_parse_from([
        "voxslice",
        "-d",
        "6x6x6",
        "-i",
        "m",
        "-f",
        "v+",
        "-s",
        "-o",
        prefix.to_str().unwrap(),
        model.to_str().unwrap(),
    ])
    .unwrap();
    let summary = run(&cli).unwrap();

    assert_eq!(summary.files, vec![dir.path().join("stack_.png")]);
    assert_eq!(summary.stats.surface_cells, 56);
    assert_eq!(summary.stats.fill.filled_cells, 8);

    let stacked = image::open(&summary.files[0]).unwrap().to_rgba8();
    assert_eq!(stacked.dimensions(), (6, 36));
    assert_eq!(opaque_pixels(&summary.files[0]).len(), 64);
}

#[test]
fn test_run_exit_codes() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.obj");
    let cli = Cli::try_parse_from(["voxslice", missing.to_str().unwrap()]).unwrap();
    assert_eq!(run(&cli).unwrap_err().exit_code(), 2);

    let model = dir.path().join("box.obj");
    fs::write(&model, BOXED_OBJ).unwrap();
    let prefix = dir.path().join("no_such_dir").join("s_");
    let cli = Cli::try_parse_from([
        "voxslice",
        "-d",
        "4",
        "-o",
        prefix.to_str().unwrap(),
        model.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(run(&cli).unwrap_err().exit_code(), 4);
}
