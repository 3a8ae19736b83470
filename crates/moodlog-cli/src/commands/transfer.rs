//! Export, import and share commands

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use moodlog_core::export::{
    entries_to_csv, parse_import, share_payload, share_summary, SHARE_TITLE,
};
use moodlog_core::{EntryStore, ExportFile, ImportStats, Journal};

use crate::cli::ExportFormat;

/// Export entries as JSON or CSV to a file, or stdout
pub fn cmd_export<S: EntryStore>(
    journal: &Journal<S>,
    format: ExportFormat,
    out: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<()> {
    let entries = journal.entries().context("Failed to load entries")?;
    let count = entries.len();

    let content = match format {
        ExportFormat::Json => ExportFile::new(entries, now).to_json()?,
        ExportFormat::Csv => entries_to_csv(&entries).context("Failed to write CSV")?,
    };

    match out {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            println!("✅ Exported {} entries to {}", count, path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}

/// Merge entries from an export file, keeping one entry per date
///
/// A file that fails to parse leaves the store untouched.
pub fn cmd_import<S: EntryStore>(journal: &Journal<S>, file: &Path) -> Result<ImportStats> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;

    let parsed = parse_import(&content)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let stats = journal
        .import(parsed.entries)
        .context("Failed to save imported entries")?;

    println!("✅ Import complete");
    println!("   Entries in file: {}", stats.imported);
    println!("   Added: {}", stats.added);
    if stats.skipped > 0 {
        println!("   Skipped (date already logged): {}", stats.skipped);
    }

    Ok(stats)
}

/// Print the share payload (recent entries) or the compact summary
pub fn cmd_share<S: EntryStore>(
    journal: &Journal<S>,
    summary: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let entries = journal.entries().context("Failed to load entries")?;

    if summary {
        let compact = share_summary(&entries, now.date_naive()).to_compact_json()?;
        println!("{}", compact);
    } else {
        let payload = share_payload(&entries, SHARE_TITLE, now);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Ok(())
}
