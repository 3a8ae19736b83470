//! Behavioral pattern detectors
//!
//! Each detector looks at the whole history and yields at most one sentence.
//! The engine runs them in registration order.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Weekday};

use crate::config::InsightConfig;
use crate::models::MoodEntry;

use super::stats::{mean, pearson};
use super::types::PatternKind;

/// A detector that may produce one pattern sentence
pub trait Pattern: Send + Sync {
    fn kind(&self) -> PatternKind;

    fn detect(&self, entries: &[MoodEntry]) -> Option<String>;
}

fn is_weekend(entry: &MoodEntry) -> bool {
    matches!(entry.date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Mean intensity on weekends and on weekdays, if both have entries
pub fn weekend_vs_weekday(entries: &[MoodEntry]) -> Option<(f64, f64)> {
    let (weekend, weekday): (Vec<&MoodEntry>, Vec<&MoodEntry>) =
        entries.iter().partition(|e| is_weekend(e));

    let intensities = |list: &[&MoodEntry]| -> Vec<f64> {
        list.iter()
            .map(|e| f64::from(e.effective_intensity()))
            .collect()
    };

    Some((mean(&intensities(&weekend))?, mean(&intensities(&weekday))?))
}

/// Number of distinct week buckets the entries fall into
///
/// A bucket is the year plus the week of the month (`ceil(day / 7)`), so the
/// first week of every month in a year shares a bucket.
pub fn week_buckets(entries: &[MoodEntry]) -> usize {
    entries
        .iter()
        .map(|e| (e.date.year(), e.date.day().div_ceil(7)))
        .collect::<HashSet<_>>()
        .len()
}

/// Compares weekend and weekday intensity
///
/// Silent until the history covers `min_weeks` week buckets.
pub struct WeekendPattern {
    min_gap: f64,
    min_weeks: usize,
}

impl WeekendPattern {
    pub fn new() -> Self {
        Self {
            min_gap: 0.5,
            min_weeks: 4,
        }
    }

    pub fn with_min_weeks(min_weeks: usize) -> Self {
        Self {
            min_weeks,
            ..Self::new()
        }
    }
}

impl Default for WeekendPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for WeekendPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Weekend
    }

    fn detect(&self, entries: &[MoodEntry]) -> Option<String> {
        if week_buckets(entries) < self.min_weeks {
            return None;
        }
        let (weekend, weekday) = weekend_vs_weekday(entries)?;
        if weekend > weekday + self.min_gap {
            Some("You tend to feel better on weekends".to_string())
        } else if weekday > weekend + self.min_gap {
            Some("Your mood is more positive during weekdays".to_string())
        } else {
            None
        }
    }
}

/// Pearson r between sleep quality and intensity
///
/// Only entries with a usable sleep rating count; fewer than `min_samples`
/// of them gives 0.
pub fn sleep_mood_correlation(entries: &[MoodEntry], min_samples: usize) -> f64 {
    let (sleep, intensity): (Vec<f64>, Vec<f64>) = entries
        .iter()
        .filter_map(|e| {
            e.effective_sleep()
                .map(|s| (f64::from(s), f64::from(e.effective_intensity())))
        })
        .unzip();

    if sleep.len() < min_samples {
        return 0.0;
    }
    pearson(&sleep, &intensity)
}

pub struct SleepCorrelationPattern {
    min_samples: usize,
    threshold: f64,
}

impl SleepCorrelationPattern {
    pub fn new() -> Self {
        Self {
            min_samples: 5,
            threshold: 0.6,
        }
    }

    pub fn with_thresholds(min_samples: usize, threshold: f64) -> Self {
        Self {
            min_samples,
            threshold,
        }
    }
}

impl Default for SleepCorrelationPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for SleepCorrelationPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::SleepCorrelation
    }

    fn detect(&self, entries: &[MoodEntry]) -> Option<String> {
        let r = sleep_mood_correlation(entries, self.min_samples);
        (r > self.threshold)
            .then(|| "Better sleep quality strongly correlates with improved mood".to_string())
    }
}

/// Trigger with the highest mean intensity among those seen at least
/// `min_occurrences` times
///
/// Ties keep the trigger seen first.
pub fn most_positive_trigger(entries: &[MoodEntry], min_occurrences: usize) -> Option<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut samples: HashMap<&str, Vec<f64>> = HashMap::new();

    for entry in entries {
        for trigger in &entry.triggers {
            let bucket = samples.entry(trigger.as_str()).or_insert_with(|| {
                order.push(trigger.as_str());
                Vec::new()
            });
            bucket.push(f64::from(entry.effective_intensity()));
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for trigger in order {
        let values = &samples[trigger];
        if values.len() < min_occurrences {
            continue;
        }
        let Some(avg) = mean(values) else { continue };
        if best.map_or(true, |(_, high)| avg > high) {
            best = Some((trigger, avg));
        }
    }

    best.map(|(trigger, _)| trigger.to_string())
}

pub struct TriggerPattern {
    min_occurrences: usize,
}

impl TriggerPattern {
    pub fn new() -> Self {
        Self { min_occurrences: 2 }
    }
}

impl Default for TriggerPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for TriggerPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Trigger
    }

    fn detect(&self, entries: &[MoodEntry]) -> Option<String> {
        most_positive_trigger(entries, self.min_occurrences)
            .map(|trigger| format!("{} activities tend to boost your mood", trigger))
    }
}

/// The built-in detectors, in the order their sentences appear
pub fn builtin_patterns(config: &InsightConfig) -> Vec<Box<dyn Pattern>> {
    vec![
        Box::new(WeekendPattern::with_min_weeks(config.weekend_min_weeks)),
        Box::new(SleepCorrelationPattern::with_thresholds(
            config.min_sleep_samples,
            config.sleep_correlation_threshold,
        )),
        Box::new(TriggerPattern::new()),
    ]
}
