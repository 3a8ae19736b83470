//! Insight and summary report commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use moodlog_core::insights::summarize;
use moodlog_core::{EntryStore, InsightConfig, InsightEngine, Journal, TimeRange};

pub fn cmd_insights<S: EntryStore>(
    journal: &Journal<S>,
    config: &InsightConfig,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let entries = journal.entries().context("Failed to load entries")?;
    let engine = InsightEngine::from_config(config);

    let Some(insights) = engine.compute(&entries, today) else {
        println!("No entries yet. Insights appear once you start logging.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("📊 Mood Insights ({} entries)", insights.total_entries);
    println!("   ─────────────────────────────");
    println!(
        "   🔥 Streak: {} day(s) current, {} longest",
        insights.streaks.current, insights.streaks.longest
    );
    println!("   ⚖️  Stability: {}%", insights.stability_percent());
    println!("   📈 Mood trend: {}", insights.mood_trend);
    println!("   ⚡ Energy trend: {}", insights.energy_trend);

    if !insights.mood_distribution.is_empty() {
        println!();
        println!("Mood distribution:");
        for count in &insights.mood_distribution {
            println!(
                "   {} {:<12} {:>4}",
                count.mood.emoji, count.mood.label, count.count
            );
        }
    }

    let sections = [
        ("Patterns", "🔎", &insights.patterns),
        ("Predictions", "🔮", &insights.predictions),
        ("Recommendations", "💡", &insights.recommendations),
    ];
    for (title, icon, lines) in sections {
        if lines.is_empty() {
            continue;
        }
        println!();
        println!("{}:", title);
        for line in lines {
            println!("   {} {}", icon, line);
        }
    }

    Ok(())
}

/// Print a summary report, optionally writing it as JSON into `out`
///
/// Returns the path of the written report.
pub fn cmd_summary<S: EntryStore>(
    journal: &Journal<S>,
    range: TimeRange,
    today: NaiveDate,
    json: bool,
    out: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let entries = journal.entries().context("Failed to load entries")?;
    let report = summarize(&entries, range, today);

    if let Some(dir) = out {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        let path = dir.join(report.file_name(today));
        fs::write(&path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        println!("✅ Report written to {}", path.display());
        return Ok(Some(path));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(None);
    }

    println!(
        "📅 Summary: {} ({} entries)",
        report.period, report.total_entries
    );
    println!("   ─────────────────────────────");
    if report.total_entries == 0 {
        println!("   No entries in this period.");
        return Ok(None);
    }

    println!("   Average intensity: {:.1}/10", report.average_intensity);
    println!("   Average energy: {:.1}/5", report.average_energy);
    println!(
        "   Intensity/energy correlation: {:.2}",
        report.intensity_energy_correlation
    );

    if !report.top_triggers.is_empty() {
        println!();
        println!("Top triggers:");
        for t in &report.top_triggers {
            println!("   {:<16} {:>4}", t.trigger, t.count);
        }
    }

    println!();
    println!("Goals:");
    println!(
        "   Daily logging:   {:>5.1}%",
        report.goal_progress.daily_logging
    );
    println!(
        "   Positive moods:  {:>5.1}%",
        report.goal_progress.positive_ratio
    );
    println!("   Energy:          {:>5.1}%", report.goal_progress.energy);

    if !report.insights.is_empty() {
        println!();
        for line in &report.insights {
            println!("   💡 {}", line);
        }
    }

    Ok(None)
}
