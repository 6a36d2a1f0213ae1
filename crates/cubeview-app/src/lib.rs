//! The cubeview viewer: window, event handling, and the per-frame loop.

mod error;
pub mod reload;
pub mod render_loop;
pub mod window;

use cubeview_config::{CliArgs, Config, PlatformDirs};
use tracing::info;

pub use error::AppError;
pub use reload::{ConfigWatcher, restart_required};
pub use render_loop::{FrameSteps, LoopState, RenderLoop};
pub use window::{App, run};

/// Resolve the config/log directories and load `config.ron` with CLI
/// overrides applied. `--config` replaces the platform config directory.
///
/// The returned watcher follows later edits to the same file.
pub fn load_config(args: &CliArgs) -> Result<(Config, PlatformDirs, ConfigWatcher), AppError> {
    let dirs = match &args.config {
        Some(dir) => {
            let dirs = PlatformDirs::in_dir(dir);
            dirs.create_dirs()?;
            dirs
        }
        None => PlatformDirs::resolve_and_create()?,
    };

    let on_disk = Config::load_or_create(&dirs.config_dir)?;
    let mut config = on_disk.clone();
    config.apply_cli_overrides(args);
    info!("Config directory: {}", dirs.config_dir.display());
    let watcher = ConfigWatcher::new(dirs.config_dir.clone(), on_disk, args.clone());
    Ok((config, dirs, watcher))
}
