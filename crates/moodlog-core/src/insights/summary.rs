//! Period summary report
//!
//! Aggregates over a time-filtered slice of the history: distribution,
//! trigger frequency, intensity/energy and sleep/mood points, goal progress,
//! and overview sentences. Serializes as the insights report export.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::MoodEntry;

use super::engine::mood_distribution;
use super::stats::{mean, pearson};
use super::types::MoodCount;

const TOP_TRIGGERS: usize = 6;

/// How far back a summary looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Last 7 days
    Week,
    /// Same day one month back
    #[default]
    Month,
    /// Same day three months back
    Quarter,
    All,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Quarter => "quarter",
            TimeRange::All => "all",
        }
    }

    /// First day included in the range, `None` for `All`
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeRange::Week => Some(today - Duration::days(7)),
            TimeRange::Month => today.checked_sub_months(Months::new(1)),
            TimeRange::Quarter => today.checked_sub_months(Months::new(3)),
            TimeRange::All => None,
        }
    }

    pub fn filter<'a>(&self, entries: &'a [MoodEntry], today: NaiveDate) -> Vec<&'a MoodEntry> {
        match self.cutoff(today) {
            Some(cutoff) => entries.iter().filter(|e| e.date >= cutoff).collect(),
            None => entries.iter().collect(),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "all" => Ok(TimeRange::All),
            _ => Err(format!("Unknown time range: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCount {
    pub trigger: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityEnergyPoint {
    pub date: NaiveDate,
    pub intensity: u8,
    pub energy: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepMoodPoint {
    pub date: NaiveDate,
    pub sleep: u8,
    /// Mean catalog value of the entry's moods
    pub avg_mood: f64,
}

/// Progress toward the three standing goals, each a percentage capped at 100
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// Entries in the last 7 days out of 7
    pub daily_logging: f64,
    /// Share of entries with a positive mood (value >= 4)
    pub positive_ratio: f64,
    /// Mean energy out of 5
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub period: TimeRange,
    pub total_entries: usize,
    pub mood_distribution: Vec<MoodCount>,
    pub top_triggers: Vec<TriggerCount>,
    pub intensity_energy: Vec<IntensityEnergyPoint>,
    pub intensity_energy_correlation: f64,
    pub sleep_mood: Vec<SleepMoodPoint>,
    pub goal_progress: GoalProgress,
    pub insights: Vec<String>,
    pub average_intensity: f64,
    pub average_energy: f64,
    pub generated_at: DateTime<Utc>,
}

impl SummaryReport {
    /// File name used when the report is exported
    pub fn file_name(&self, today: NaiveDate) -> String {
        format!("mood-insights-{}-{}.json", self.period, today.format("%Y-%m-%d"))
    }
}

/// Trigger counts, most frequent first (ties keep first-seen order)
pub fn trigger_frequency(entries: &[&MoodEntry], limit: usize) -> Vec<TriggerCount> {
    let mut counts: Vec<TriggerCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for trigger in entries.iter().flat_map(|e| &e.triggers) {
        match index.get(trigger.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(trigger.as_str(), counts.len());
                counts.push(TriggerCount {
                    trigger: trigger.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Goal progress as of `today`
///
/// Daily logging looks at the whole history; the other two use the
/// filtered entries.
pub fn goal_progress(all: &[MoodEntry], filtered: &[&MoodEntry], today: NaiveDate) -> GoalProgress {
    let week_ago = today - Duration::days(7);
    let last_week = all.iter().filter(|e| e.date >= week_ago).count();
    let daily_logging = last_week as f64 / 7.0 * 100.0;

    let positive_ratio = if filtered.is_empty() {
        0.0
    } else {
        let positive = filtered
            .iter()
            .filter(|e| e.moods.iter().any(|m| m.value >= 4))
            .count();
        positive as f64 / filtered.len() as f64 * 100.0
    };

    let energies: Vec<f64> = filtered
        .iter()
        .map(|e| f64::from(e.effective_energy()))
        .collect();
    let energy = mean(&energies).unwrap_or(0.0) / 5.0 * 100.0;

    GoalProgress {
        daily_logging: daily_logging.min(100.0),
        positive_ratio: positive_ratio.min(100.0),
        energy: energy.min(100.0),
    }
}

fn overview_insights(
    filtered: &[&MoodEntry],
    top_triggers: &[TriggerCount],
    sleep_mood: &[SleepMoodPoint],
    avg_intensity: f64,
    avg_energy: f64,
) -> Vec<String> {
    let mut out = Vec::new();
    if filtered.is_empty() {
        return out;
    }

    out.push(format!(
        "Your average mood intensity is {:.1}/10",
        avg_intensity
    ));

    if avg_energy >= 4.0 {
        out.push("You maintain high energy levels consistently".to_string());
    } else if avg_energy <= 2.0 {
        out.push("Consider focusing on activities that boost your energy".to_string());
    }

    if let Some(top) = top_triggers.first() {
        out.push(format!("Your most common mood trigger is \"{}\"", top.trigger));
    }

    if sleep_mood.len() >= 3 {
        let good_sleep: Vec<f64> = sleep_mood
            .iter()
            .filter(|p| p.sleep >= 4)
            .map(|p| p.avg_mood)
            .collect();
        if mean(&good_sleep).unwrap_or(0.0) > avg_intensity {
            out.push("Better sleep quality correlates with improved mood".to_string());
        }
    }

    let mixed = filtered.iter().filter(|e| e.moods.len() > 1).count();
    if mixed as f64 > filtered.len() as f64 * 0.3 {
        out.push("You often experience complex, mixed emotions".to_string());
    }

    out
}

/// Build the summary for `range` as of `today`
pub fn summarize(entries: &[MoodEntry], range: TimeRange, today: NaiveDate) -> SummaryReport {
    let filtered = range.filter(entries, today);
    let owned: Vec<MoodEntry> = filtered.iter().map(|e| (*e).clone()).collect();

    let intensity_energy: Vec<IntensityEnergyPoint> = filtered
        .iter()
        .map(|e| IntensityEnergyPoint {
            date: e.date,
            intensity: e.effective_intensity(),
            energy: e.effective_energy(),
        })
        .collect();

    let intensities: Vec<f64> = intensity_energy
        .iter()
        .map(|p| f64::from(p.intensity))
        .collect();
    let energies: Vec<f64> = intensity_energy
        .iter()
        .map(|p| f64::from(p.energy))
        .collect();

    let sleep_mood: Vec<SleepMoodPoint> = filtered
        .iter()
        .filter_map(|e| {
            e.effective_sleep().map(|sleep| SleepMoodPoint {
                date: e.date,
                sleep,
                avg_mood: e.average_mood_value(),
            })
        })
        .collect();

    let average_intensity = mean(&intensities).unwrap_or(0.0);
    let average_energy = mean(&energies).unwrap_or(0.0);
    let top_triggers = trigger_frequency(&filtered, TOP_TRIGGERS);
    let insights = overview_insights(
        &filtered,
        &top_triggers,
        &sleep_mood,
        average_intensity,
        average_energy,
    );

    debug!(
        period = range.as_str(),
        entries = filtered.len(),
        "Summary computed"
    );

    SummaryReport {
        period: range,
        total_entries: filtered.len(),
        mood_distribution: mood_distribution(&owned),
        top_triggers,
        intensity_energy_correlation: pearson(&intensities, &energies),
        intensity_energy,
        sleep_mood,
        goal_progress: goal_progress(entries, &filtered, today),
        insights,
        average_intensity,
        average_energy,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MoodKind;
    use crate::test_utils::{day, entry, sample_journal, EntryBuilder};

    #[test]
    fn test_time_range_cutoffs() {
        let today = day("2024-03-31");
        assert_eq!(TimeRange::Week.cutoff(today), Some(day("2024-03-24")));
        assert_eq!(TimeRange::Month.cutoff(today), Some(day("2024-02-29")));
        assert_eq!(TimeRange::Quarter.cutoff(today), Some(day("2023-12-31")));
        assert_eq!(TimeRange::All.cutoff(today), None);
        assert_eq!("Quarter".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
    }

    #[test]
    fn test_week_filter() {
        let entries = vec![
            entry("2024-03-20", 5),
            entry("2024-03-24", 5),
            entry("2024-03-30", 5),
        ];
        let filtered = TimeRange::Week.filter(&entries, day("2024-03-31"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_trigger_frequency_top_six() {
        let entries = sample_journal();
        let refs: Vec<&MoodEntry> = entries.iter().collect();
        let top = trigger_frequency(&refs, 6);

        assert_eq!(top.len(), 6);
        assert_eq!(top[0].trigger, "Work/Career");
        assert_eq!(top[0].count, 3);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_sample_summary() {
        let entries = sample_journal();
        let report = summarize(&entries, TimeRange::All, day("2024-01-15"));

        assert_eq!(report.total_entries, 6);
        assert!((report.average_intensity - 6.5).abs() < 1e-9);
        assert!((report.average_energy - 3.0).abs() < 1e-9);
        assert_eq!(report.sleep_mood.len(), 6);
        assert_eq!(
            report.insights,
            vec![
                "Your average mood intensity is 6.5/10",
                "Your most common mood trigger is \"Work/Career\"",
                "You often experience complex, mixed emotions",
            ]
        );
        assert!((report.goal_progress.daily_logging - 600.0 / 7.0).abs() < 1e-9);
        assert!((report.goal_progress.positive_ratio - 50.0).abs() < 1e-9);
        assert!((report.goal_progress.energy - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_progress_capped() {
        let entries: Vec<_> = (1..=9)
            .map(|d| {
                EntryBuilder::new(&format!("2024-04-0{}", d))
                    .moods(&[MoodKind::VeryHappy])
                    .energy(5)
                    .build()
            })
            .collect();
        let refs: Vec<&MoodEntry> = entries.iter().collect();
        let progress = goal_progress(&entries, &refs, day("2024-04-09"));
        assert_eq!(progress.daily_logging, 100.0);
        assert_eq!(progress.positive_ratio, 100.0);
        assert_eq!(progress.energy, 100.0);
    }

    #[test]
    fn test_energy_and_sleep_sentences() {
        let entries: Vec<_> = (1..=3)
            .map(|d| {
                EntryBuilder::new(&format!("2024-04-0{}", d))
                    .moods(&[MoodKind::VeryHappy])
                    .intensity(3)
                    .energy(5)
                    .sleep(5)
                    .build()
            })
            .collect();
        let report = summarize(&entries, TimeRange::All, day("2024-04-03"));
        assert!(report
            .insights
            .contains(&"You maintain high energy levels consistently".to_string()));
        // good-sleep mood value 5 exceeds intensity 3
        assert!(report
            .insights
            .contains(&"Better sleep quality correlates with improved mood".to_string()));
        assert_eq!(report.intensity_energy_correlation, 0.0);
    }

    #[test]
    fn test_empty_range() {
        let entries = sample_journal();
        let report = summarize(&entries, TimeRange::Week, day("2025-01-01"));
        assert_eq!(report.total_entries, 0);
        assert!(report.insights.is_empty());
        assert!(report.mood_distribution.is_empty());
        assert_eq!(report.goal_progress, GoalProgress::default());
        assert_eq!(
            report.file_name(day("2025-01-01")),
            "mood-insights-week-2025-01-01.json"
        );
    }
}
