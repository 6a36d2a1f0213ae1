//! The `cubeview` binary: load configuration, start logging, open the viewer.
//!
//! Run with `cargo run -p cubeview-app -- --preset relief` to pick a scene
//! variant, or `--textures <dir>` to point at another set of face images.

use clap::Parser;
use cubeview_config::CliArgs;
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let (config, dirs, watcher) = match cubeview_app::load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    cubeview_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(
        "cubeview starting: preset {:?}, textures {}",
        config.shading.preset,
        config.textures.directory.display()
    );

    if let Err(e) = cubeview_app::run(config, watcher) {
        error!("cubeview failed: {e}");
        std::process::exit(1);
    }
}
