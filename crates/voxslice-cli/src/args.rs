//! Command-line arguments and settings-file merging.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use voxslice::{Axis, FillMode, Interpolation, RequestedShape, VoxelizeSettings};

use crate::error::CliError;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "voxslice", version)]
#[command(about = "Voxelize a textured mesh into a stack of PNG slices", long_about = None)]
pub struct Cli {
    /// Model to voxelize (Wavefront OBJ)
    pub model: PathBuf,

    /// Output size: WIDTHxHEIGHTxLAYERS, WIDTHxLAYERS or LAYERS; missing
    /// components follow the model's aspect ratio
    #[arg(short = 'd', long = "dimensions", value_name = "DIMS")]
    pub dimensions: Option<RequestedShape>,

    /// Output file prefix
    #[arg(short, long, default_value = "slice", value_name = "PREFIX")]
    pub output: String,

    /// Texture filtering: nearest (n), linear (l) or mipmap (m)
    #[arg(short, long, value_name = "MODE")]
    pub interpolation: Option<Interpolation>,

    /// Interior fill: none (fn), flatplus (f+), volumeplus (v+), flatx (fx),
    /// flaty (fy) or flatz (fz)
    #[arg(short, long, value_name = "MODE")]
    pub fill: Option<FillMode>,

    /// Write all layers into one vertically stacked image
    #[arg(short, long)]
    pub single_file: bool,

    /// Let the last Z sweep overwrite everything it covers
    #[arg(short = 'r', long)]
    pub prefer_front: bool,

    /// Axis to export slices along
    #[arg(short, long, value_name = "AXIS")]
    pub axis: Option<Axis>,

    /// TOML settings file; flags given on the command line override it
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Settings from the settings file (or defaults) with flags applied.
    pub fn resolve_settings(&self) -> Result<VoxelizeSettings, CliError> {
        let mut settings = match &self.settings {
            Some(path) => load_settings(path).map_err(CliError::Usage)?,
            None => VoxelizeSettings::default(),
        };

        if let Some(shape) = self.dimensions {
            settings.shape = shape;
        }
        if let Some(interpolation) = self.interpolation {
            settings.interpolation = interpolation;
        }
        if let Some(fill) = self.fill {
            settings.fill = fill;
        }
        if let Some(axis) = self.axis {
            settings.export_axis = axis;
        }
        settings.single_file |= self.single_file;
        settings.prefer_front |= self.prefer_front;

        settings.validate()?;
        Ok(settings)
    }

    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Read a TOML settings file.
pub fn load_settings(path: &Path) -> anyhow::Result<VoxelizeSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let settings = toml::from_str(&text)
        .with_context(|| format!("failed to parse settings file {}", path.display()))?;
    Ok(settings)
}
