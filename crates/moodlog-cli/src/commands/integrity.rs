//! Store validation and repair commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use moodlog_core::integrity::{check_store, repair_store};
use moodlog_core::{EntryStore, IntegrityReport, Journal};

use super::core::confirm;

pub fn cmd_validate<S: EntryStore>(journal: &Journal<S>) -> Result<IntegrityReport> {
    let raw = journal.store().raw().context("Failed to read entry store")?;
    let report = check_store(raw.as_deref());

    if report.is_valid {
        println!("✅ Data is valid ({} entries)", report.total_entries);
        return Ok(report);
    }

    println!("⚠️  Data integrity issues found");
    println!("   Total entries: {}", report.total_entries);
    println!("   Corrupted entries: {}", report.corrupted_entries);
    println!();
    for issue in &report.issues {
        println!("   - {}", issue);
    }
    println!();
    println!("Run 'moodlog repair' to fix them.");

    Ok(report)
}

/// Rewrite the store with repaired entries
///
/// Returns the number of entries repaired, or `None` when nothing was written.
pub fn cmd_repair<S: EntryStore>(
    journal: &Journal<S>,
    yes: bool,
    now: DateTime<Utc>,
) -> Result<Option<usize>> {
    let raw = journal.store().raw().context("Failed to read entry store")?;
    let report = check_store(raw.as_deref());
    if report.is_valid {
        println!("✅ Nothing to repair ({} entries)", report.total_entries);
        return Ok(None);
    }

    let outcome = repair_store(raw.as_deref(), now);

    if !yes {
        println!(
            "This will repair {} entries and drop {} unrecoverable ones.",
            outcome.repaired, outcome.dropped
        );
        if !confirm("Continue?")? {
            println!("Cancelled");
            return Ok(None);
        }
    }

    journal
        .replace_all(&outcome.entries)
        .context("Failed to write repaired entries")?;

    println!("✅ Repaired {} entries", outcome.repaired);
    if outcome.dropped > 0 {
        println!("   Dropped: {}", outcome.dropped);
    }
    println!("   Entries now: {}", outcome.entries.len());

    Ok(Some(outcome.repaired))
}
