use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::info;

pub const LOG_ENV: &str = "IMAGE_RENAME_LOG";

/// Where log lines go. The terminal UI owns the screen, so it logs to a file.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("image-rename.log")
}

/// Initializes `env_logger`, filtered by `IMAGE_RENAME_LOG` (default `info`).
pub fn init_logger(target: &LogTarget) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().filter_or(LOG_ENV, "info"));

    match target {
        LogTarget::Stderr => {
            builder.format_timestamp(None).target(Target::Stderr);
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            builder.format_timestamp_secs().target(Target::Pipe(Box::new(file)));
        }
    }

    builder.try_init().context("Failed to initialize logger")?;

    if let LogTarget::File(path) = target {
        info!("Logging to file: {}", path.display());
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
