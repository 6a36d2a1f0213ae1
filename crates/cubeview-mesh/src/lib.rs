//! Sphere meshes for the cube-map viewer.

mod icosphere;

pub use icosphere::{IcoSphere, MAX_DETAIL, icosahedron, icosphere};
