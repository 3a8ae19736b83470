//! Configuration loading
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for an override in the data dir (`<data dir>/config.toml`)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override file take their default values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/moodlog.toml");

/// Environment variable that relocates the data dir
pub const DATA_DIR_ENV: &str = "MOODLOG_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub backup: BackupConfig,
    pub analyzer: AnalyzerConfig,
    pub insights: InsightConfig,
    pub settings: UserSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub entries_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            entries_file: "entries.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    pub dir: String,
    pub keep: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: "backups".to_string(),
            keep: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub latency_ms: u64,
}

impl AnalyzerConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { latency_ms: 2000 }
    }
}

/// Thresholds used by the insight engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub trend_window: usize,
    /// Week buckets needed before the weekend/weekday pattern is reported
    pub weekend_min_weeks: usize,
    pub mood_trend_delta: f64,
    pub energy_trend_delta: f64,
    pub min_sleep_samples: usize,
    pub sleep_correlation_threshold: f64,
    pub stability_min_entries: usize,
    pub streak_lookback_days: u32,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            trend_window: 6,
            weekend_min_weeks: 4,
            mood_trend_delta: 0.5,
            energy_trend_delta: 0.3,
            min_sleep_samples: 5,
            sleep_correlation_threshold: 0.6,
            stability_min_entries: 5,
            streak_lookback_days: 30,
        }
    }
}

/// User-facing settings stored with backups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub notifications: bool,
    pub theme: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notifications: true,
            theme: Some("system".to_string()),
        }
    }
}

impl Config {
    /// Load config for a data dir (override file first, then embedded defaults)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let override_path = data_dir.join("config.toml");
        let content = if override_path.exists() {
            debug!(path = %override_path.display(), "Loading config override");
            fs::read_to_string(&override_path)?
        } else {
            DEFAULT_CONFIG.to_string()
        };
        Self::parse(&content)
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    pub fn entries_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.storage.entries_file)
    }

    pub fn backup_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.backup.dir)
    }
}

/// Default data directory
///
/// `$MOODLOG_DATA_DIR` if set, otherwise the platform data dir.
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moodlog")
}
