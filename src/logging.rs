use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;

use crate::config::LoggingConfig;

/// Installs a file-backed subscriber when `config.file` is set.
///
/// The terminal belongs to the UI, so without a log file nothing is
/// installed and events are dropped. Returns whether a subscriber was
/// installed.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    if config.file.trim().is_empty() {
        return Ok(false);
    }

    let path = Path::new(config.file.trim());
    ensure_parent_dir(path)?;
    let file = File::options().create(true).append(true).open(path)?;
    let level = parse_level(&config.level);

    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(level)
        .with_target(true)
        .with_writer(Mutex::new(file));

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;

    tracing::info!(path = %path.display(), %level, "logging initialised");
    Ok(true)
}

pub fn parse_level(s: &str) -> Level {
    s.trim().parse().unwrap_or(Level::INFO)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
