//! Tracing subscriber setup driven by the `logging` config section

use crate::config::LoggingSettings;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Map a config level name onto a tracing filter directive
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" | "FATAL" => "error",
        _ => "info",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level; `verbose` forces
/// debug. Returns `false` if a subscriber was already installed.
pub fn init(settings: &LoggingSettings, verbose: bool) -> bool {
    let level = if verbose {
        "debug"
    } else {
        level_directive(&settings.log_level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if !settings.log_to_file {
        return builder.try_init().is_ok();
    }

    match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file_path)
    {
        Ok(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .is_ok(),
        Err(e) => {
            let installed = builder.try_init().is_ok();
            warn!(
                "⚠️ Cannot open log file {} ({}), logging to stderr",
                settings.log_file_path.display(),
                e
            );
            installed
        }
    }
}
