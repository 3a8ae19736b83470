//! Entry commands (add, list, edit, delete, clear)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use moodlog_core::analyzer::suggest_catalog_moods;
use moodlog_core::{
    EntryDraft, EntryEdit, EntryStore, HistoryQuery, ImageMoodAnalyzer, Journal, MoodEntry,
    MoodKind, TRIGGERS,
};
use tracing::warn;

use super::analyze::{load_image, print_analysis};
use super::core::{confirm, parse_date};
use super::truncate;

/// Arguments of `moodlog add`
#[derive(Debug, Default)]
pub struct AddArgs {
    pub date: Option<String>,
    pub moods: Vec<String>,
    pub intensity: u8,
    pub energy: u8,
    pub sleep: Option<u8>,
    pub reflection: Option<String>,
    pub triggers: Vec<String>,
    pub image: Option<PathBuf>,
}

impl AddArgs {
    /// Build the draft; moods must name catalog entries
    pub fn to_draft(&self, today: NaiveDate) -> Result<EntryDraft> {
        let date = match self.date.as_deref() {
            Some(s) => parse_date(s)?,
            None => today,
        };

        let mut draft = EntryDraft::new(date);
        for label in &self.moods {
            let kind: MoodKind = label.parse().map_err(anyhow::Error::msg)?;
            if !draft.moods.contains(&kind) {
                draft.toggle_mood(kind);
            }
        }
        for trigger in &self.triggers {
            let trigger = canonical_trigger(trigger);
            if !trigger.is_empty() && !draft.triggers.contains(&trigger) {
                draft.toggle_trigger(&trigger);
            }
        }

        draft.intensity = self.intensity;
        draft.energy = self.energy;
        draft.sleep_quality = self.sleep;
        draft.reflection = self.reflection.clone().unwrap_or_default();
        Ok(draft)
    }
}

/// Catalog spelling of a trigger when it matches one, otherwise the trimmed input
fn canonical_trigger(trigger: &str) -> String {
    let trimmed = trigger.trim();
    TRIGGERS
        .iter()
        .find(|t| t.eq_ignore_ascii_case(trimmed))
        .map(|t| t.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

pub async fn cmd_add<S: EntryStore>(
    journal: &Journal<S>,
    analyzer: &ImageMoodAnalyzer,
    args: &AddArgs,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<MoodEntry> {
    let mut draft = args.to_draft(today)?;

    if let Some(ref path) = args.image {
        let payload = load_image(path)?;
        println!("🔍 Analyzing image...");

        // A failed analysis still lets the entry be saved with its image
        match analyzer.analyze_payload(&payload).await {
            Ok(analysis) => {
                print_analysis(&analysis);
                if draft.moods.is_empty() {
                    draft.moods = suggest_catalog_moods(&analysis);
                }
                draft.image_analysis = Some(analysis);
            }
            Err(e) => {
                warn!(error = %e, "Image analysis failed");
                println!("   ⚠️  {}", e);
            }
        }
        draft.image = Some(payload.into_data_uri());
    }

    if draft.moods.is_empty() {
        bail!("Select at least one mood (--moods happy,calm). Run 'moodlog catalog' to see them.");
    }

    let entry = journal.add(draft, now).context("Failed to save entry")?;

    println!("✅ Entry saved: {}", entry.id);
    println!("   Date: {}", entry.date);
    println!("   Moods: {}", mood_list(&entry));
    println!("   Intensity: {}/10  Energy: {}/5", entry.intensity, entry.energy);
    if let Some(sleep) = entry.sleep_quality {
        println!("   Sleep: {}/5", sleep);
    }
    if !entry.triggers.is_empty() {
        println!("   Triggers: {}", entry.triggers.join(", "));
    }

    Ok(entry)
}

fn mood_list(entry: &MoodEntry) -> String {
    entry
        .moods
        .iter()
        .map(|m| format!("{} {}", m.emoji, m.label))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn cmd_list<S: EntryStore>(
    journal: &Journal<S>,
    query: &HistoryQuery,
    limit: usize,
    today: NaiveDate,
) -> Result<()> {
    let entries = journal.entries().context("Failed to load entries")?;
    let matching = query.apply(&entries, today);

    if matching.is_empty() {
        if entries.is_empty() {
            println!("No entries yet. Add one with: moodlog add --moods happy");
        } else {
            println!("No entries match your search.");
        }
        return Ok(());
    }

    println!(
        "{:<16} {:<10} {:<24} {:>4} {:>6}  REFLECTION",
        "ID", "DATE", "MOODS", "INT", "ENERGY"
    );
    println!("{}", "-".repeat(90));

    for entry in matching.iter().take(limit) {
        println!(
            "{:<16} {:<10} {:<24} {:>4} {:>6}  {}",
            truncate(&entry.id, 16),
            entry.date,
            truncate(&mood_list(entry), 24),
            entry.intensity,
            entry.energy,
            truncate(&entry.reflection, 30)
        );
    }

    if matching.len() > limit {
        println!();
        println!("Showing {} of {} entries", limit, matching.len());
    }

    Ok(())
}

pub fn cmd_edit<S: EntryStore>(journal: &Journal<S>, id: &str, edit: &EntryEdit) -> Result<()> {
    if edit.is_empty() {
        bail!("Nothing to change. Use --reflection, --intensity or --energy.");
    }

    let entry = journal
        .edit(id, edit)
        .with_context(|| format!("Failed to update entry {}", id))?;

    println!("✅ Updated entry {} ({})", entry.id, entry.date);
    println!("   Intensity: {}/10  Energy: {}/5", entry.intensity, entry.energy);
    if entry.has_reflection() {
        println!("   Reflection: {}", truncate(&entry.reflection, 60));
    }
    Ok(())
}

pub fn cmd_delete<S: EntryStore>(journal: &Journal<S>, id: &str) -> Result<()> {
    let removed = journal
        .delete(id)
        .with_context(|| format!("Failed to delete entry {}", id))?;
    println!("🗑️  Deleted entry {} ({})", removed.id, removed.date);
    Ok(())
}

pub fn cmd_clear<S: EntryStore>(journal: &Journal<S>, yes: bool) -> Result<()> {
    let count = journal.entries().context("Failed to load entries")?.len();
    if count == 0 {
        println!("No entries to clear");
        return Ok(());
    }

    if !yes {
        println!(
            "⚠️  This will permanently delete all {} entries. This cannot be undone.",
            count
        );
        if !confirm("Continue?")? {
            println!("Cancelled");
            return Ok(());
        }
    }

    let cleared = journal.clear().context("Failed to clear entries")?;
    println!("✅ Cleared {} entries", cleared);
    Ok(())
}
