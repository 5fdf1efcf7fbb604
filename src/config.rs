use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::setup::{MAX_MINUTES, MIN_MINUTES};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_question_count")]
    pub default_question_count: usize,
    #[serde(default = "default_time_limit_minutes")]
    pub default_time_limit_minutes: u32,
    /// Overrides the platform data directory for stored bases, attempts and logs.
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Prefilled on the sign-in screen.
    #[serde(default)]
    pub last_user: Option<String>,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_question_count() -> usize {
    10
}
fn default_time_limit_minutes() -> u32 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_question_count: default_question_count(),
            default_time_limit_minutes: default_time_limit_minutes(),
            data_dir: None,
            log_level: default_log_level(),
            last_user: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizmaster")
            .join("config.toml")
    }

    /// Clamp numeric defaults into the ranges the setup form accepts.
    pub fn validate(&mut self) {
        self.default_question_count = self.default_question_count.max(1);
        self.default_time_limit_minutes = self
            .default_time_limit_minutes
            .clamp(MIN_MINUTES, MAX_MINUTES);
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }

    /// Directory holding stored data and the log file. Blank overrides are ignored.
    pub fn data_dir(&self) -> PathBuf {
        match self.data_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("quizmaster"),
        }
    }
}
