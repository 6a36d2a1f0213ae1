use cubeview_config::{ConfigError, PlatformError};
use cubeview_render::RenderContextError;
use thiserror::Error;

/// Startup and event-loop failures reported by the `cubeview` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("platform directories: {0}")]
    Platform(#[from] PlatformError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization: {0}")]
    Render(#[from] RenderContextError),
}
