//! Learnctl configuration
//!
//! Configuration lives in config.toml. Lookup order:
//! 1. `--config` flag
//! 2. $LEARNCTL_CONFIG
//! 3. $XDG_CONFIG_HOME/learnboard/config.toml
//! 4. ~/.config/learnboard/config.toml
//!
//! A missing discovered file means defaults; a missing explicit file is an
//! error.

use anyhow::{Context, Result};
use learnboard_shared::audit::{AuditOptions, DEFAULT_COUNT_DIVISOR};
use learnboard_shared::report::ReportOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnConfig {
    /// Directory holding user.json, xp.json, progress.json, audit.json, skills.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// XP per audit when counts must be approximated from sums
    #[serde(default = "default_count_divisor")]
    pub audit_count_divisor: u64,

    /// ANSI colors in terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_count_divisor() -> u64 {
    DEFAULT_COUNT_DIVISOR
}

fn default_color() -> bool {
    true
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            audit_count_divisor: default_count_divisor(),
            color: default_color(),
        }
    }
}

impl LearnConfig {
    /// Divisor clamped to at least 1
    pub fn effective_count_divisor(&self) -> u64 {
        self.audit_count_divisor.max(1)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            audit: AuditOptions {
                count_divisor: self.effective_count_divisor(),
            },
        }
    }

    /// Parse config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config.toml")
    }

    /// Load from an explicit path, or discover one
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            return Self::from_toml(&text);
        }

        match Self::discover_path() {
            Some(path) if path.exists() => {
                debug!(target: "learnctl", "loading config from {}", path.display());
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("cannot read config {}", path.display()))?;
                Self::from_toml(&text)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Discover config file path with fallback chain
    pub fn discover_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LEARNCTL_CONFIG") {
            return Some(PathBuf::from(path));
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("learnboard").join(CONFIG_FILE));
        }

        if let Ok(home) = std::env::var("HOME") {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("learnboard")
                    .join(CONFIG_FILE),
            );
        }

        None
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("cannot serialize config")
    }
}
