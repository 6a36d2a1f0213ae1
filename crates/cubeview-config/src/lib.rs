//! Configuration system for cubeview.
//!
//! Runtime settings persist to disk as a RON file. CLI flags (clap) override
//! whatever was loaded, and a reload check reports when the file changed.

mod cli;
mod config;
mod error;
mod platform;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, MeshConfig, NormalSampling, ShadingConfig, ShadingPreset,
    TextureConfig, WindowConfig,
};
pub use error::ConfigError;
pub use platform::{PlatformDirs, PlatformError};
