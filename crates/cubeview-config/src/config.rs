//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Cube-map face image locations.
    pub textures: TextureConfig,
    /// Displacement and shading settings.
    pub shading: ShadingConfig,
    /// Icosphere tessellation.
    pub mesh: MeshConfig,
    /// Orbit camera settings.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Where the three cube-map face sets live on disk.
///
/// A face file is `<directory>/<prefix>_<SUFFIX>.<extension>` with suffixes
/// `PX, NX, PY, NY, PZ, NZ`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Directory containing the face images.
    pub directory: PathBuf,
    /// Prefix of the height faces (also drawn as the background).
    pub height_prefix: String,
    /// Prefix of the normal faces.
    pub normal_prefix: String,
    /// Prefix of the color/biome faces.
    pub color_prefix: String,
    /// Image file extension, without the dot.
    pub extension: String,
}

/// Which of the four scene variants to render.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
pub enum ShadingPreset {
    /// Exaggerated displacement (k = 2.0), normal map lighting, biome color.
    #[default]
    Biome,
    /// Subtle displacement (k = 0.1), grayscale normal map lighting.
    Relief,
    /// No displacement, grayscale normal map lighting.
    Flat,
    /// No custom material: undisplaced sphere with geometry-normal shading.
    Passthrough,
}

/// Where the lighting normal comes from, overriding the preset.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
pub enum NormalSampling {
    /// The interpolated mesh normal.
    Geometry,
    /// Normal map sampled in the vertex stage and interpolated.
    PerVertex,
    /// Normal map sampled for every pixel.
    PerPixel,
}

/// Displacement and shading configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShadingConfig {
    /// Scene variant.
    pub preset: ShadingPreset,
    /// Overrides the preset's displacement scale when set.
    pub displacement_scale: Option<f32>,
    /// Overrides the preset's normal source when set.
    pub normal_source: Option<NormalSampling>,
    /// Normalize the shading vector before the half-Lambert dot product.
    pub normalize_direction: bool,
    /// Experimental: replace the lighting normal with one derived from
    /// finite differences of the height map.
    pub derived_normal: bool,
    /// Angular step (in unit-sphere units) used by the derived normal.
    pub derived_normal_epsilon: f32,
}

/// Icosphere tessellation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Sphere radius in world units.
    pub radius: f32,
    /// Number of extra edge splits per icosahedron face (0 = bare icosahedron).
    pub detail: u32,
}

/// Orbit camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Initial camera position; the camera orbits the origin.
    pub position: [f32; 3],
    /// Orbit rotation speed multiplier.
    pub rotate_speed: f32,
    /// Zoom speed multiplier.
    pub zoom_speed: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            title: "cubeview".to_string(),
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("public"),
            height_prefix: "face".to_string(),
            normal_prefix: "normal_face".to_string(),
            color_prefix: "biome_face".to_string(),
            extension: "png".to_string(),
        }
    }
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            preset: ShadingPreset::Biome,
            displacement_scale: None,
            normal_source: None,
            normalize_direction: true,
            derived_normal: false,
            derived_normal_epsilon: 0.002,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            detail: 500,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 90.0,
            near: 0.001,
            far: 100.0,
            position: [0.0, 15.0, 15.0],
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.01,
            max_distance: 90.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("detail: 500"));
        assert!(ron_str.contains("preset: Biome"));
    }

    #[test]
    fn test_default_texture_prefixes_follow_face_naming() {
        let textures = TextureConfig::default();
        assert_eq!(textures.height_prefix, "face");
        assert_eq!(textures.normal_prefix, "normal_face");
        assert_eq!(textures.color_prefix, "biome_face");
        assert_eq!(textures.extension, "png");
    }

    #[test]
    fn test_default_camera_starts_above_and_behind() {
        let camera = CameraConfig::default();
        assert_eq!(camera.position, [0.0, 15.0, 15.0]);
        assert!((camera.fov_y_degrees - 90.0).abs() < f32::EPSILON);
        assert!(camera.near < camera.far);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.shading.preset = ShadingPreset::Relief;
        config.shading.displacement_scale = Some(0.5);
        config.shading.normal_source = Some(NormalSampling::PerVertex);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), shading: (preset: Flat))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.mesh, MeshConfig::default());
        assert_eq!(config.shading.preset, ShadingPreset::Flat);
        assert!(config.shading.normalize_direction);
    }

    #[test]
    fn test_normal_source_parses_from_ron() {
        let config: Config =
            ron::from_str("(shading: (normal_source: Some(PerVertex)))").unwrap();
        assert_eq!(config.shading.normal_source, Some(NormalSampling::PerVertex));
        assert_eq!(ShadingConfig::default().normal_source, None);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.mesh.detail = 64;
        config.textures.directory = PathBuf::from("maps");

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.shading.preset = ShadingPreset::Passthrough;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(
            result.map(|c| c.shading.preset),
            Some(ShadingPreset::Passthrough)
        );
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
