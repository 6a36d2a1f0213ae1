//! wgpu rendering of the displaced, cube-mapped sphere: surface management,
//! generated shaders, cube-map textures, and the per-frame draw.

pub mod buffer;
pub mod camera;
pub mod cube_texture;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod renderer;
pub mod shader;
pub mod wgsl;

pub use buffer::{MeshBuffer, SphereVertex};
pub use camera::{Camera, CameraUniform};
pub use cube_texture::{CubeTextureError, GpuCubeMap};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use renderer::SceneRenderer;
pub use shader::ShaderLibrary;
pub use wgsl::{ShadingUniform, sphere_shader_source};
