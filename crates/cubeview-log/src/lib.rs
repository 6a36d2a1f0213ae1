//! Structured logging for cubeview.
//!
//! Console output through `tracing-subscriber` with uptime timestamps and
//! module paths, plus a JSON log file in debug builds. The level comes from
//! `RUST_LOG` first, then the config's `debug.log_level`.

use cubeview_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config says otherwise.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for `cubeview.log` (only used when `debug_build`)
/// * `debug_build` - enables the JSON file layer
/// * `config` - optional configuration supplying the log level
///
/// ```no_run
/// use cubeview_log::init_logging;
///
/// init_logging(None, false, None);
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config_filter(config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file_enabled = debug_build && config.is_none_or(|c| c.debug.log_to_file);
    if file_enabled
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("cubeview.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Resolve the filter directive string from the config.
///
/// A bare level such as `debug` keeps wgpu and naga at `warn`; anything
/// containing a directive (`=` or `,`) is used verbatim.
pub fn filter_string(config: Option<&Config>) -> String {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if level.contains('=') || level.contains(',') => level.to_string(),
        Some(level) if !level.is_empty() => format!("{level},wgpu=warn,naga=warn"),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// The config's filter, or [`DEFAULT_FILTER`] when its directives do not parse.
fn config_filter(config: Option<&Config>) -> EnvFilter {
    let filter_str = filter_string(config);
    EnvFilter::try_new(&filter_str).unwrap_or_else(|e| {
        eprintln!("Invalid log level '{filter_str}' ({e}), using '{DEFAULT_FILTER}'");
        default_env_filter()
    })
}

fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
