use glam::Vec3;

use cubeview_config::{NormalSampling, ShadingConfig, ShadingPreset};
use cubeview_cubemap::CubeMapSet;

/// Fixed light direction of the half-Lambert term.
pub const LIGHT_DIRECTION: Vec3 = Vec3::Y;

/// Where the lighting normal comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalSource {
    /// The interpolated vertex normal.
    Geometry,
    /// The normal map, sampled once per vertex and interpolated.
    NormalMapPerVertex,
    /// The normal map, sampled per pixel at the interpolated direction.
    NormalMapPerPixel,
}

/// How the lighting term becomes a pixel color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputPolicy {
    /// `(dt, dt, dt, 1)`.
    Grayscale,
    /// `(color.rgb * dt, 1)`, color sampled at the interpolated direction.
    ColorModulated,
    /// Experimental: grayscale lighting of a normal rebuilt from height
    /// differences around the pixel. Never selected by a preset.
    DerivedNormal,
}

/// Everything that distinguishes one scene variant from another.
///
/// Maps are borrowed. An unbound map (`None`) samples as zero, exactly like
/// the blank texture the GPU binds in its place.
#[derive(Clone, Copy, Debug)]
pub struct ShadingParameters<'a> {
    pub height_map: Option<&'a CubeMapSet>,
    pub normal_map: Option<&'a CubeMapSet>,
    pub color_map: Option<&'a CubeMapSet>,
    /// `k` in `P' = P + N * h * k`.
    pub displacement_scale: f32,
    /// Radius of the undisplaced sphere; the derived normal rebuilds
    /// `d * (radius + h * k)`.
    pub radius: f32,
    pub normal_source: NormalSource,
    pub output: OutputPolicy,
    /// Normalize the shading vector before the dot product.
    pub normalize_direction: bool,
    /// Perturbation step of the derived-normal output.
    pub derived_normal_epsilon: f32,
    /// Declared for shader compatibility; constant and unused.
    pub time: f32,
    /// `false` for the passthrough variant, which draws the bare sphere.
    pub custom_material: bool,
}

impl ShadingParameters<'static> {
    /// Parameters of a preset, with no maps bound.
    pub fn from_preset(preset: ShadingPreset) -> Self {
        let base = Self {
            height_map: None,
            normal_map: None,
            color_map: None,
            displacement_scale: 0.0,
            radius: 1.0,
            normal_source: NormalSource::NormalMapPerPixel,
            output: OutputPolicy::Grayscale,
            normalize_direction: true,
            derived_normal_epsilon: 0.002,
            time: 0.0,
            custom_material: true,
        };
        match preset {
            ShadingPreset::Biome => Self {
                displacement_scale: 2.0,
                output: OutputPolicy::ColorModulated,
                ..base
            },
            ShadingPreset::Relief => Self {
                displacement_scale: 0.1,
                ..base
            },
            ShadingPreset::Flat => base,
            ShadingPreset::Passthrough => Self {
                normal_source: NormalSource::Geometry,
                custom_material: false,
                ..base
            },
        }
    }

    /// Preset parameters with the config's overrides applied.
    pub fn from_config(config: &ShadingConfig) -> Self {
        let mut params = Self::from_preset(config.preset);
        if let Some(k) = config.displacement_scale {
            if params.custom_material {
                params.displacement_scale = k;
            } else {
                tracing::warn!("Displacement scale override ignored by the passthrough preset");
            }
        }
        if let Some(sampling) = config.normal_source {
            if params.custom_material {
                params.normal_source = NormalSource::from(sampling);
            } else {
                tracing::warn!("Normal source override ignored by the passthrough preset");
            }
        }
        params.normalize_direction = config.normalize_direction;
        params.derived_normal_epsilon = config.derived_normal_epsilon;
        if config.derived_normal {
            if params.custom_material {
                tracing::info!("Experimental derived-normal shading enabled");
                params.output = OutputPolicy::DerivedNormal;
            } else {
                tracing::warn!("Derived-normal shading ignored by the passthrough preset");
            }
        }
        params
    }
}

impl From<NormalSampling> for NormalSource {
    fn from(sampling: NormalSampling) -> Self {
        match sampling {
            NormalSampling::Geometry => NormalSource::Geometry,
            NormalSampling::PerVertex => NormalSource::NormalMapPerVertex,
            NormalSampling::PerPixel => NormalSource::NormalMapPerPixel,
        }
    }
}

impl<'a> ShadingParameters<'a> {
    /// Shade a sphere of `radius`.
    pub fn with_radius(self, radius: f32) -> Self {
        Self { radius, ..self }
    }

    /// Bind maps, keeping every scalar setting.
    ///
    /// The passthrough variant has no material and ignores the maps.
    pub fn with_maps<'b>(
        self,
        height_map: Option<&'b CubeMapSet>,
        normal_map: Option<&'b CubeMapSet>,
        color_map: Option<&'b CubeMapSet>,
    ) -> ShadingParameters<'b> {
        let bind = self.custom_material;
        ShadingParameters {
            height_map: height_map.filter(|_| bind),
            normal_map: normal_map.filter(|_| bind),
            color_map: color_map.filter(|_| bind),
            displacement_scale: self.displacement_scale,
            radius: self.radius,
            normal_source: self.normal_source,
            output: self.output,
            normalize_direction: self.normalize_direction,
            derived_normal_epsilon: self.derived_normal_epsilon,
            time: self.time,
            custom_material: self.custom_material,
        }
    }

    /// Whether vertices can move at all.
    pub fn displaces(&self) -> bool {
        self.custom_material && self.displacement_scale != 0.0
    }

    /// Whether the shader samples the normal map.
    pub fn uses_normal_map(&self) -> bool {
        self.custom_material && self.normal_source != NormalSource::Geometry
    }

    /// Whether the shader samples the color map.
    pub fn uses_color_map(&self) -> bool {
        self.custom_material && self.output == OutputPolicy::ColorModulated
    }
}

impl Default for ShadingParameters<'static> {
    fn default() -> Self {
        Self::from_preset(ShadingPreset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_match_scene_variants() {
        let biome = ShadingParameters::from_preset(ShadingPreset::Biome);
        assert_eq!(biome.displacement_scale, 2.0);
        assert_eq!(biome.normal_source, NormalSource::NormalMapPerPixel);
        assert_eq!(biome.output, OutputPolicy::ColorModulated);

        let relief = ShadingParameters::from_preset(ShadingPreset::Relief);
        assert_eq!(relief.displacement_scale, 0.1);
        assert_eq!(relief.output, OutputPolicy::Grayscale);

        let flat = ShadingParameters::from_preset(ShadingPreset::Flat);
        assert_eq!(flat.displacement_scale, 0.0);
        assert!(!flat.displaces());
        assert!(flat.uses_normal_map());

        let passthrough = ShadingParameters::from_preset(ShadingPreset::Passthrough);
        assert!(!passthrough.custom_material);
        assert!(!passthrough.uses_normal_map());
        assert!(!passthrough.uses_color_map());
    }

    #[test]
    fn test_no_preset_selects_derived_normal() {
        for preset in [
            ShadingPreset::Biome,
            ShadingPreset::Relief,
            ShadingPreset::Flat,
            ShadingPreset::Passthrough,
        ] {
            assert_ne!(ShadingParameters::from_preset(preset).output, OutputPolicy::DerivedNormal);
        }
    }

    #[test]
    fn test_config_overrides() {
        let config = ShadingConfig {
            preset: ShadingPreset::Relief,
            displacement_scale: Some(0.5),
            normal_source: None,
            normalize_direction: false,
            derived_normal: true,
            derived_normal_epsilon: 0.01,
        };
        let params = ShadingParameters::from_config(&config);
        assert_eq!(params.displacement_scale, 0.5);
        assert!(!params.normalize_direction);
        assert_eq!(params.output, OutputPolicy::DerivedNormal);
        assert_eq!(params.derived_normal_epsilon, 0.01);
    }

    #[test]
    fn test_config_selects_per_vertex_normal_map() {
        let config = ShadingConfig {
            preset: ShadingPreset::Relief,
            normal_source: Some(NormalSampling::PerVertex),
            ..Default::default()
        };
        let params = ShadingParameters::from_config(&config);
        assert_eq!(params.normal_source, NormalSource::NormalMapPerVertex);
        assert!(params.uses_normal_map());
        assert_eq!(params.displacement_scale, 0.1);

        let geometry = ShadingConfig {
            normal_source: Some(NormalSampling::Geometry),
            ..Default::default()
        };
        let params = ShadingParameters::from_config(&geometry);
        assert_eq!(params.normal_source, NormalSource::Geometry);
        assert!(!params.uses_normal_map());
    }

    #[test]
    fn test_radius_survives_map_binding() {
        let map = CubeMapSet::blank();
        let params = ShadingParameters::default()
            .with_radius(10.0)
            .with_maps(Some(&map), None, None);
        assert_eq!(params.radius, 10.0);
        assert_eq!(ShadingParameters::default().radius, 1.0);
    }

    #[test]
    fn test_passthrough_ignores_overrides_and_maps() {
        let config = ShadingConfig {
            preset: ShadingPreset::Passthrough,
            displacement_scale: Some(3.0),
            normal_source: Some(NormalSampling::PerPixel),
            derived_normal: true,
            ..Default::default()
        };
        let params = ShadingParameters::from_config(&config);
        assert!(!params.displaces());
        assert_eq!(params.output, OutputPolicy::Grayscale);
        assert_eq!(params.normal_source, NormalSource::Geometry);

        let map = CubeMapSet::blank();
        let bound = params.with_maps(Some(&map), Some(&map), Some(&map));
        assert!(bound.height_map.is_none());
        assert!(bound.normal_map.is_none());
        assert!(bound.color_map.is_none());
    }
}
