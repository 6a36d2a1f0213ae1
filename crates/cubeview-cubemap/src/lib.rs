//! Cube maps: six square face images addressed by a 3D direction.
//!
//! Covers the face/direction mapping shared with the GPU, CPU-side sampling
//! with a zero fallback for missing faces, face-set loading from
//! `<prefix>_<SUFFIX>.png` files, and a background loader that never blocks
//! the render thread.

mod error;
mod face;
mod io;
mod loader;
mod normal;
mod projection;
mod set;

pub use error::CubeMapError;
pub use face::CubeFace;
pub use io::{LoadReport, face_path, load_cube_map};
pub use loader::{CubeMapLoader, CubeMapSlot, LoadRequest, LoadedCubeMap};
pub use normal::{finite_difference_normal, tangent_basis};
pub use projection::{direction_to_face_uv, face_uv_to_direction};
pub use set::{CubeMapSet, Filter};
