//! Picks up edits to `config.ron` while the viewer runs.
//!
//! Camera settings apply on the next frame. Everything else is baked into
//! the window, GPU resources, or loads at startup and only takes effect after
//! a restart.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use cubeview_config::{CliArgs, Config};
use tracing::warn;

/// How often the config file is re-read.
pub const RELOAD_INTERVAL: Duration = Duration::from_secs(1);

/// Re-reads `config.ron` at most once per interval.
#[derive(Debug)]
pub struct ConfigWatcher {
    config_dir: PathBuf,
    args: CliArgs,
    on_disk: Config,
    interval: Duration,
    last_check: Instant,
}

impl ConfigWatcher {
    /// Watch `config_dir`, whose file currently holds `on_disk`. CLI `args`
    /// keep overriding whatever the file says.
    pub fn new(config_dir: PathBuf, on_disk: Config, args: CliArgs) -> Self {
        Self {
            config_dir,
            args,
            on_disk,
            interval: RELOAD_INTERVAL,
            last_check: Instant::now(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// The effective config if the interval has passed and the file changed.
    pub fn poll(&mut self) -> Option<Config> {
        if self.last_check.elapsed() < self.interval {
            return None;
        }
        self.last_check = Instant::now();
        self.check()
    }

    /// Re-read the file now. Returns the new config with CLI overrides
    /// applied, or `None` when it is unchanged or unreadable.
    pub fn check(&mut self) -> Option<Config> {
        match self.on_disk.reload(&self.config_dir) {
            Ok(Some(changed)) => {
                self.on_disk = changed.clone();
                let mut effective = changed;
                effective.apply_cli_overrides(&self.args);
                Some(effective)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring config edit: {e}");
                None
            }
        }
    }
}

/// Sections that differ between `current` and `new` but cannot change
/// while the viewer runs.
pub fn restart_required(current: &Config, new: &Config) -> Vec<&'static str> {
    let mut sections = Vec::new();
    if current.window != new.window {
        sections.push("window");
    }
    if current.textures != new.textures {
        sections.push("textures");
    }
    if current.shading != new.shading {
        sections.push("shading");
    }
    if current.mesh != new.mesh {
        sections.push("mesh");
    }
    if current.debug != new.debug {
        sections.push("debug");
    }
    sections
}
