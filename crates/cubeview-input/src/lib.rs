//! Pointer input and the orbit camera it drives.

pub mod mouse;
pub mod orbit;

pub use mouse::MouseState;
pub use orbit::OrbitCamera;
