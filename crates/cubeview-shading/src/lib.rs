//! Displacement and half-Lambert shading of a cube-mapped sphere.
//!
//! [`ShadingParameters`] fully describes one scene variant. The functions in
//! [`stage`] are the CPU reference for the vertex and fragment programs the
//! renderer generates from the same parameters.

mod derived;
mod params;
pub mod stage;

pub use derived::derived_normal;
pub use params::{LIGHT_DIRECTION, NormalSource, OutputPolicy, ShadingParameters};
pub use stage::{
    VertexOutput, displace_mesh, displace_vertex, fragment_stage, lighting_term, vertex_stage,
};
