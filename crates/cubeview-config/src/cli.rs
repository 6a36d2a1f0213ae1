//! Command-line argument parsing for cubeview.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, NormalSampling, ShadingPreset};

/// cubeview command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cubeview", about = "Displacement-shaded cube-map sphere viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Scene variant to render.
    #[arg(long, value_enum)]
    pub preset: Option<ShadingPreset>,

    /// Directory holding the cube-map face images.
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// Override the preset's displacement scale.
    #[arg(long)]
    pub displacement_scale: Option<f32>,

    /// Override the preset's normal source.
    #[arg(long, value_enum)]
    pub normal_source: Option<NormalSampling>,

    /// Icosphere detail (edge splits per icosahedron face).
    #[arg(long)]
    pub detail: Option<u32>,

    /// Enable the experimental height-derived normal.
    #[arg(long)]
    pub derived_normal: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(preset) = args.preset {
            self.shading.preset = preset;
        }
        if let Some(ref dir) = args.textures {
            self.textures.directory = dir.clone();
        }
        if let Some(scale) = args.displacement_scale {
            self.shading.displacement_scale = Some(scale);
        }
        if let Some(source) = args.normal_source {
            self.shading.normal_source = Some(source);
        }
        if let Some(detail) = args.detail {
            self.mesh.detail = detail;
        }
        if args.derived_normal {
            self.shading.derived_normal = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
