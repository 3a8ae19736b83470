//! Backup management commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use moodlog_core::{BackupManager, EntryStore, Journal, UserSettings};

/// Create a new backup
pub fn cmd_backup_create<S: EntryStore>(
    journal: &Journal<S>,
    manager: &BackupManager,
    settings: &UserSettings,
    now: DateTime<Utc>,
) -> Result<String> {
    let entries = journal.entries().context("Failed to load entries")?;

    println!("Creating backup...");

    let info = manager
        .create(&entries, settings, now)
        .context("Failed to create backup")?;

    println!("✅ Backup created: {}", info.name);
    println!("   Location: {}", info.path.display());
    println!("   Size: {}", format_size(info.size));
    println!("   Entries: {}", entries.len());
    println!("   📦 Compressed");

    Ok(info.name)
}

/// List available backups
pub fn cmd_backup_list(manager: &BackupManager) -> Result<()> {
    let backups = manager.list().with_context(|| {
        format!(
            "Failed to access backup directory: {}",
            manager.dir().display()
        )
    })?;

    if backups.is_empty() {
        println!("No backups found");
        println!("Directory: {}", manager.dir().display());
        return Ok(());
    }

    println!("Available backups ({}):", manager.dir().display());
    println!();
    println!("{:<44} {:>10} {:>17}", "NAME", "SIZE", "CREATED");
    println!("{}", "-".repeat(73));

    for backup in backups {
        let created = backup.created_at.format("%Y-%m-%d %H:%M");
        println!(
            "{:<44} {:>10} {:>17}",
            backup.name,
            format_size(backup.size),
            created
        );
    }

    Ok(())
}

/// Restore entries from a backup, replacing the current history
pub fn cmd_backup_restore<S: EntryStore>(
    journal: &Journal<S>,
    manager: &BackupManager,
    name: &str,
    force: bool,
) -> Result<usize> {
    let name = if name == "latest" {
        manager
            .latest()?
            .map(|b| b.name)
            .ok_or_else(|| anyhow::anyhow!("No backups found in {}", manager.dir().display()))?
    } else {
        name.to_string()
    };

    let existing = journal.entries().map(|e| e.len()).unwrap_or(0);
    if existing > 0 && !force {
        anyhow::bail!(
            "The journal already has {} entries.\nUse --force to overwrite.",
            existing
        );
    }

    println!("Restoring from backup: {}", name);

    let backup = manager
        .read(&name)
        .with_context(|| format!("Failed to read backup {}", name))?;
    journal
        .replace_all(&backup.entries)
        .context("Failed to restore entries")?;

    println!("✅ Entries restored from: {}", name);
    println!("   Entries: {}", backup.metadata.total_entries);
    if let (Some(first), Some(last)) = (backup.metadata.first_entry, backup.metadata.last_entry) {
        println!("   Span: {} to {}", first, last);
    }
    println!("   Backed up: {}", backup.metadata.backup_date.format("%Y-%m-%d %H:%M"));

    Ok(backup.entries.len())
}

/// Format a byte size as human-readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
