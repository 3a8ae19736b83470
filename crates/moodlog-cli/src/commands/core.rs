//! Shared command utilities
//!
//! This module contains:
//! - `App` - Resolved data dir and config, opens the journal and backups
//! - `parse_date` / `confirm` - Argument and prompt helpers
//! - `cmd_catalog` - Print the mood and trigger catalogs

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use moodlog_core::catalog::ENERGY_LEVELS;
use moodlog_core::{
    default_data_dir, BackupManager, Config, ImageMoodAnalyzer, JsonFileStore, Journal, MoodKind,
    TRIGGERS,
};

/// Data dir and configuration for one CLI invocation
pub struct App {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl App {
    /// Resolve the data dir (`--data` wins) and load its config
    pub fn open(data: Option<&Path>) -> Result<Self> {
        let data_dir = data.map(Path::to_path_buf).unwrap_or_else(default_data_dir);
        let config = Config::load(&data_dir)
            .with_context(|| format!("Failed to load config from {}", data_dir.display()))?;
        Ok(Self { data_dir, config })
    }

    pub fn journal(&self) -> Journal<JsonFileStore> {
        Journal::new(JsonFileStore::new(self.config.entries_path(&self.data_dir)))
    }

    pub fn backups(&self) -> BackupManager {
        BackupManager::new(
            self.config.backup_dir(&self.data_dir),
            self.config.backup.keep,
        )
    }

    pub fn analyzer(&self) -> ImageMoodAnalyzer {
        ImageMoodAnalyzer::from_config(&self.config.analyzer)
    }
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Ask a yes/no question on stdin, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

pub fn cmd_catalog() -> Result<()> {
    println!("Moods:");
    println!("{:<4} {:<14} {:>5}  COLOR", "", "LABEL", "VALUE");
    for mood in MoodKind::all() {
        println!(
            "{:<4} {:<14} {:>5}  {}",
            mood.emoji(),
            mood.label(),
            mood.value(),
            mood.color()
        );
    }

    println!();
    println!("Triggers:");
    println!("  {}", TRIGGERS.join(", "));

    println!();
    println!("Energy levels:");
    for (value, label) in ENERGY_LEVELS {
        println!("  {} {}", value, label);
    }

    Ok(())
}
