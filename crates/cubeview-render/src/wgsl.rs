//! WGSL generation for one set of [`ShadingParameters`].
//!
//! Normal source, output policy and normalization are baked into the
//! source; scalars travel in the `ShadingUniform`. Every variant declares the
//! same bindings so one pipeline layout serves all of them.

use bytemuck::{Pod, Zeroable};

use cubeview_shading::{NormalSource, OutputPolicy, ShadingParameters};

/// Scalar shading inputs, constant across frames.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShadingUniform {
    pub displacement_scale: f32,
    pub derived_normal_epsilon: f32,
    pub time: f32,
    pub radius: f32,
}

impl ShadingUniform {
    pub fn from_params(params: &ShadingParameters<'_>) -> Self {
        Self {
            displacement_scale: if params.displaces() {
                params.displacement_scale
            } else {
                0.0
            },
            derived_normal_epsilon: params.derived_normal_epsilon,
            time: params.time,
            radius: params.radius,
        }
    }
}

/// Shared declarations: uniforms, cube maps, and helpers.
const PRELUDE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    inv_sky_view_proj: mat4x4<f32>,
};

struct ShadingUniform {
    displacement_scale: f32,
    derived_normal_epsilon: f32,
    time: f32,
    radius: f32,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(0) @binding(1) var<uniform> shading: ShadingUniform;

@group(1) @binding(0) var height_map: texture_cube<f32>;
@group(1) @binding(1) var normal_map: texture_cube<f32>;
@group(1) @binding(2) var color_map: texture_cube<f32>;
@group(1) @binding(3) var map_sampler: sampler;

const LIGHT_DIRECTION: vec3<f32> = vec3<f32>(0.0, 1.0, 0.0);

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) direction: vec3<f32>,
    @location(1) shading_vector: vec3<f32>,
};

fn sample_cube(map: texture_cube<f32>, dir: vec3<f32>) -> vec4<f32> {
    return textureSampleLevel(map, map_sampler, dir, 0.0);
}

fn normalize_or_zero(v: vec3<f32>) -> vec3<f32> {
    let len = length(v);
    if len > 0.0 {
        return v / len;
    }
    return vec3<f32>(0.0);
}
"#;

const DERIVED_NORMAL: &str = r#"
fn displaced_point(d: vec3<f32>) -> vec3<f32> {
    let u = normalize(d);
    let h = sample_cube(height_map, u).r;
    return u * (shading.radius + h * shading.displacement_scale);
}

fn four_sample_normal(dir: vec3<f32>, step: f32) -> vec3<f32> {
    let axis = select(vec3<f32>(1.0, 0.0, 0.0), vec3<f32>(0.0, 1.0, 0.0), abs(dir.y) < 0.99);
    let tangent = normalize(cross(axis, dir));
    let bitangent = normalize(cross(dir, tangent));
    let p1 = displaced_point(dir + tangent * step);
    let p2 = displaced_point(dir + bitangent * step);
    let p3 = displaced_point(dir - tangent * step);
    let p4 = displaced_point(dir - bitangent * step);
    return normalize_or_zero(cross(p2 - p1, p3 - p1) + cross(p3 - p1, p4 - p1));
}

fn derived_normal(direction: vec3<f32>) -> vec3<f32> {
    let dir = normalize_or_zero(direction);
    let eps = shading.derived_normal_epsilon;
    let rotated = vec3<f32>(-dir.x, dir.y, -dir.z);
    let c = cross(rotated, dir);
    if dot(c, c) <= 1e-8 {
        return four_sample_normal(dir, eps);
    }
    let tangent = normalize(c);
    let bitangent = normalize(cross(dir, tangent));

    let p0 = displaced_point(dir);
    let p1 = displaced_point(dir + tangent * eps);
    let p2 = displaced_point(dir + bitangent * eps);
    let n = normalize_or_zero(cross(p1 - p0, p2 - p0));
    return select(n, -n, dot(n, dir) < 0.0);
}
"#;

/// Complete WGSL module (`vs_main` + `fs_main`) for `params`.
pub fn sphere_shader_source(params: &ShadingParameters<'_>) -> String {
    let custom = params.custom_material;
    let mut src = String::from(PRELUDE);

    let light = if params.normalize_direction {
        "normalize_or_zero(n)"
    } else {
        "n"
    };
    src.push_str(&format!(
        r#"
fn lighting_term(n: vec3<f32>) -> f32 {{
    return dot({light}, LIGHT_DIRECTION) * 0.5 + 0.5;
}}
"#
    ));

    let derived = custom && params.output == OutputPolicy::DerivedNormal;
    if derived {
        src.push_str(DERIVED_NORMAL);
    }

    // Vertex stage.
    let displacement = if params.displaces() {
        "let h = sample_cube(height_map, in.normal).r;\n    \
         let displaced = in.position + in.normal * h * shading.displacement_scale;"
    } else {
        "let displaced = in.position;"
    };
    let shading_vector = match params.normal_source {
        NormalSource::NormalMapPerVertex if custom => "sample_cube(normal_map, in.normal).rgb",
        _ => "in.normal",
    };
    src.push_str(&format!(
        r#"
@vertex
fn vs_main(in: VertexInput) -> VertexOutput {{
    {displacement}
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(displaced, 1.0);
    out.direction = in.normal;
    out.shading_vector = {shading_vector};
    return out;
}}
"#
    ));

    // Fragment stage.
    let normal = if derived {
        "derived_normal(in.direction)"
    } else {
        match params.normal_source {
            NormalSource::NormalMapPerPixel if custom => {
                "sample_cube(normal_map, in.direction).rgb"
            }
            _ => "in.shading_vector",
        }
    };
    let color = match params.output {
        OutputPolicy::ColorModulated if custom => {
            "let c = sample_cube(color_map, in.direction);\n    \
             return vec4<f32>(c.rgb * dt, 1.0);"
        }
        _ => "return vec4<f32>(dt, dt, dt, 1.0);",
    };
    src.push_str(&format!(
        r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let n = {normal};
    let dt = lighting_term(n);
    {color}
}}
"#
    ));

    src
}

/// Cache key naming the variant a source was generated for.
pub fn variant_name(params: &ShadingParameters<'_>) -> String {
    format!(
        "sphere-{}-{}-{:?}-{:?}-{}",
        if params.custom_material { "material" } else { "plain" },
        if params.displaces() { "displaced" } else { "fixed" },
        params.normal_source,
        params.output,
        if params.normalize_direction { "norm" } else { "raw" },
    )
    .to_lowercase()
}

/// Fullscreen background that samples the height map along view rays.
pub const SKYBOX_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    inv_sky_view_proj: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;

@group(1) @binding(0) var height_map: texture_cube<f32>;
@group(1) @binding(3) var map_sampler: sampler;

struct SkyOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_sky(@builtin(vertex_index) idx: u32) -> SkyOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    let ndc = uv * 2.0 - 1.0;
    var out: SkyOutput;
    // Reverse-Z far plane.
    out.position = vec4<f32>(ndc, 0.0, 1.0);
    out.ndc = ndc;
    return out;
}

@fragment
fn fs_sky(in: SkyOutput) -> @location(0) vec4<f32> {
    let world = camera.inv_sky_view_proj * vec4<f32>(in.ndc, 0.5, 1.0);
    let dir = world.xyz / world.w;
    return vec4<f32>(textureSampleLevel(height_map, map_sampler, dir, 0.0).rgb, 1.0);
}
"#;
