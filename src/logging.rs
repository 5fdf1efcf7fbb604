use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV_VAR: &str = "QUIZMASTER_LOG";
pub const LOG_FILE_NAME: &str = "quizmaster.log";

/// The terminal belongs to the UI, so logs go to a file in `data_dir`.
/// `QUIZMASTER_LOG` takes precedence over the configured level.
pub fn init(data_dir: &Path, level: &str) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()?;

    Ok(path)
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_used_without_env_override() {
        if std::env::var(LOG_ENV_VAR).is_ok() {
            return;
        }
        assert_eq!(filter_for("debug").to_string(), "debug");
    }
}
