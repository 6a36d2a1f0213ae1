//! CPU reference of the vertex and fragment programs.
//!
//! Maps are sampled bilinearly, matching the linear samplers the GPU uses.

use glam::{Vec3, Vec4};

use cubeview_cubemap::{CubeMapSet, Filter};
use cubeview_mesh::IcoSphere;

use crate::{LIGHT_DIRECTION, NormalSource, OutputPolicy, ShadingParameters, derived_normal};

fn sample(map: Option<&CubeMapSet>, dir: Vec3) -> Vec4 {
    map.map_or(Vec4::ZERO, |m| m.sample(dir, Filter::Bilinear))
}

/// What the vertex program hands to rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexOutput {
    /// Displaced object-space position, before the model-view-projection.
    pub position: Vec3,
    /// Cube-map lookup direction for the fragment program.
    pub direction: Vec3,
    /// Shading vector: the normal, or the per-vertex normal-map sample.
    pub shading: Vec3,
}

/// Half-Lambert term against the fixed up light: `dot(n, up) * 0.5 + 0.5`.
///
/// Not clamped. With `normalize` unset the raw vector is used, so
/// non-unit inputs can leave `[0, 1]`.
pub fn lighting_term(n: Vec3, normalize: bool) -> f32 {
    let n = if normalize { n.normalize_or_zero() } else { n };
    n.dot(LIGHT_DIRECTION) * 0.5 + 0.5
}

/// `P' = P + N * h * k` with `h` the red channel of the height map at `N`.
pub fn displace_vertex(params: &ShadingParameters<'_>, position: Vec3, normal: Vec3) -> Vec3 {
    if !params.displaces() {
        return position;
    }
    let h = sample(params.height_map, normal).x;
    position + normal * h * params.displacement_scale
}

/// Run the vertex program for one vertex.
pub fn vertex_stage(params: &ShadingParameters<'_>, position: Vec3, normal: Vec3) -> VertexOutput {
    let shading = match params.normal_source {
        NormalSource::NormalMapPerVertex if params.custom_material => {
            sample(params.normal_map, normal).truncate()
        }
        _ => normal,
    };
    VertexOutput {
        position: displace_vertex(params, position, normal),
        direction: normal,
        shading,
    }
}

/// Run the fragment program for an interpolated direction and shading vector.
pub fn fragment_stage(params: &ShadingParameters<'_>, direction: Vec3, shading: Vec3) -> Vec4 {
    if params.output == OutputPolicy::DerivedNormal && params.custom_material {
        let n = derived_normal(
            params.height_map,
            direction,
            params.derived_normal_epsilon,
            params.radius,
            params.displacement_scale,
        );
        let dt = lighting_term(n, params.normalize_direction);
        return Vec4::new(dt, dt, dt, 1.0);
    }

    let n = match params.normal_source {
        NormalSource::NormalMapPerPixel if params.custom_material => {
            sample(params.normal_map, direction).truncate()
        }
        _ => shading,
    };
    let dt = lighting_term(n, params.normalize_direction);

    match params.output {
        OutputPolicy::ColorModulated if params.custom_material => {
            let color = sample(params.color_map, direction);
            (color.truncate() * dt).extend(1.0)
        }
        _ => Vec4::new(dt, dt, dt, 1.0),
    }
}

/// Displaced positions of every mesh vertex.
pub fn displace_mesh(params: &ShadingParameters<'_>, mesh: &IcoSphere) -> Vec<Vec3> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .map(|(&p, &n)| displace_vertex(params, p, n))
        .collect()
}
