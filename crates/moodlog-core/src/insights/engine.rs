//! Insight Engine - orchestrates pattern detection, trends, and scoring

use chrono::NaiveDate;
use tracing::debug;

use crate::catalog::MoodKind;
use crate::config::InsightConfig;
use crate::models::{sort_chronologically, MoodEntry};

use super::patterns::{builtin_patterns, Pattern};
use super::stats::{mean, population_std_dev};
use super::streaks::streaks;
use super::trends::{energy_trend, mood_trend};
use super::types::{Insights, MoodCount, PatternKind, Streaks, Trend};

const MAX_PATTERNS: usize = 4;
const MAX_PREDICTIONS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 4;

/// Stability reported when there is too little history to judge
pub const DEFAULT_STABILITY: f64 = 50.0;

/// Recomputes insights from a full entry history
pub struct InsightEngine {
    patterns: Vec<Box<dyn Pattern>>,
    config: InsightConfig,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with default thresholds and the built-in patterns
    pub fn new() -> Self {
        Self::from_config(&InsightConfig::default())
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        let mut engine = Self {
            patterns: vec![],
            config: config.clone(),
        };

        for pattern in builtin_patterns(config) {
            engine.register(pattern);
        }

        engine
    }

    /// Register a pattern detector (runs after those already registered)
    pub fn register(&mut self, pattern: Box<dyn Pattern>) {
        self.patterns.push(pattern);
    }

    pub fn pattern_kinds(&self) -> Vec<PatternKind> {
        self.patterns.iter().map(|p| p.kind()).collect()
    }

    /// Compute insights for `entries` as of `today`
    ///
    /// Returns `None` for an empty history. The input is not modified and
    /// need not be sorted.
    pub fn compute(&self, entries: &[MoodEntry], today: NaiveDate) -> Option<Insights> {
        if entries.is_empty() {
            return None;
        }

        let mut sorted = entries.to_vec();
        sort_chronologically(&mut sorted);

        let mut patterns = Vec::new();
        for pattern in &self.patterns {
            if let Some(sentence) = pattern.detect(&sorted) {
                debug!(pattern = pattern.kind().as_str(), "Pattern detected");
                patterns.push(sentence);
            }
        }
        patterns.truncate(MAX_PATTERNS);

        let window = self.config.trend_window;
        let mood = mood_trend(&sorted, window, self.config.mood_trend_delta);
        let energy = energy_trend(&sorted, window, self.config.energy_trend_delta);

        let mut predictions = predictions(mood, energy);
        predictions.truncate(MAX_PREDICTIONS);

        let streaks = streaks(&sorted, today, self.config.streak_lookback_days);
        let stability = mood_stability(&sorted, self.config.stability_min_entries);

        let mut recommendations = recommendations(&sorted, &streaks);
        recommendations.truncate(MAX_RECOMMENDATIONS);

        let insights = Insights {
            patterns,
            predictions,
            recommendations,
            streaks,
            mood_stability: stability,
            mood_trend: mood,
            energy_trend: energy,
            mood_distribution: mood_distribution(entries),
            total_entries: entries.len(),
        };

        debug!(
            entries = insights.total_entries,
            patterns = insights.patterns.len(),
            mood_trend = %insights.mood_trend,
            energy_trend = %insights.energy_trend,
            stability = insights.mood_stability,
            "Insights computed"
        );

        Some(insights)
    }
}

fn predictions(mood: Trend, energy: Trend) -> Vec<String> {
    let mut out = Vec::new();
    match mood {
        Trend::Improving => {
            out.push("Based on recent patterns, your mood trend is positive".to_string())
        }
        Trend::Declining => {
            out.push("Consider focusing on self-care activities this week".to_string())
        }
        Trend::Stable => {}
    }
    if energy == Trend::Declining {
        out.push("Your energy levels may benefit from more rest or exercise".to_string());
    }
    out
}

/// Count each catalog mood across all entries, in catalog order
///
/// Moods that never occur are left out.
pub fn mood_distribution(entries: &[MoodEntry]) -> Vec<MoodCount> {
    MoodKind::all()
        .iter()
        .filter_map(|kind| {
            let count = entries
                .iter()
                .flat_map(|e| &e.moods)
                .filter(|m| m.label == kind.label())
                .count();
            (count > 0).then(|| MoodCount {
                mood: kind.to_mood(),
                count,
            })
        })
        .collect()
}

/// Stability score in [0, 100] from the spread of intensity
///
/// `100 - 20 * sigma`, clamped. Histories shorter than `min_entries` get
/// `DEFAULT_STABILITY`.
pub fn mood_stability(entries: &[MoodEntry], min_entries: usize) -> f64 {
    if entries.len() < min_entries {
        return DEFAULT_STABILITY;
    }
    let intensities: Vec<f64> = entries
        .iter()
        .map(|e| f64::from(e.effective_intensity()))
        .collect();
    (100.0 - population_std_dev(&intensities) * 20.0).clamp(0.0, 100.0)
}

/// Fixed checklist of suggestions, in order
pub fn recommendations(entries: &[MoodEntry], streaks: &Streaks) -> Vec<String> {
    let mut out = Vec::new();
    if entries.is_empty() {
        return out;
    }

    let energies: Vec<f64> = entries
        .iter()
        .map(|e| f64::from(e.effective_energy()))
        .collect();
    if mean(&energies).is_some_and(|avg| avg < 2.5) {
        out.push(
            "Consider incorporating more physical activity or ensuring adequate rest".to_string(),
        );
    }

    let intensities: Vec<f64> = entries
        .iter()
        .map(|e| f64::from(e.effective_intensity()))
        .collect();
    if mean(&intensities).is_some_and(|avg| avg < 4.0) {
        out.push("Try practicing gratitude or mindfulness exercises".to_string());
    }

    let reflected = entries.iter().filter(|e| e.has_reflection()).count();
    if (reflected as f64) / (entries.len() as f64) < 0.5 {
        out.push("Regular journaling could help you process emotions better".to_string());
    }

    if streaks.current < 3 {
        out.push("Try to maintain consistent daily mood tracking".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{day, entry, sample_journal, EntryBuilder};

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.pattern_kinds(),
            vec![
                PatternKind::Weekend,
                PatternKind::SleepCorrelation,
                PatternKind::Trigger
            ]
        );
    }

    #[test]
    fn test_empty_history() {
        assert!(InsightEngine::new().compute(&[], day("2024-01-15")).is_none());
    }

    #[test]
    fn test_sample_journal() {
        let entries = sample_journal();
        let insights = InsightEngine::new()
            .compute(&entries, day("2024-01-15"))
            .unwrap();

        assert_eq!(insights.total_entries, 6);
        assert_eq!(insights.streaks, Streaks { current: 6, longest: 6 });
        assert_eq!(insights.mood_trend, Trend::Stable);
        assert!(insights.predictions.is_empty());
        // weekday avg 7.25 beats weekend 5.0, but Jan 10-15 spans only two
        // week buckets, so no weekend pattern yet.
        // Social (8, 8) beats Achievement (6, 8) and Work/Career (7, 4, 8)
        assert_eq!(
            insights.patterns,
            vec!["Social activities tend to boost your mood"]
        );
        assert!(insights.recommendations.is_empty());
    }

    #[test]
    fn test_weekend_week_threshold_from_config() {
        let config = InsightConfig {
            weekend_min_weeks: 2,
            ..Default::default()
        };
        let insights = InsightEngine::from_config(&config)
            .compute(&sample_journal(), day("2024-01-15"))
            .unwrap();
        assert_eq!(
            insights.patterns[0],
            "Your mood is more positive during weekdays"
        );
        assert_eq!(insights.patterns.len(), 2);
    }

    #[test]
    fn test_distribution_sums_to_mood_count() {
        let entries = sample_journal();
        let distribution = mood_distribution(&entries);
        let total: usize = distribution.iter().map(|d| d.count).sum();
        let expected: usize = entries.iter().map(|e| e.moods.len()).sum();
        assert_eq!(total, expected);
        assert!(distribution.iter().all(|d| d.count > 0));
        // Very Sad never appears
        assert!(!distribution.iter().any(|d| d.mood.label == "Very Sad"));
    }

    #[test]
    fn test_stability_default_below_five_entries() {
        let entries = vec![entry("2024-01-01", 1), entry("2024-01-02", 10)];
        assert_eq!(mood_stability(&entries, 5), DEFAULT_STABILITY);
    }

    #[test]
    fn test_stability_decreases_with_spread() {
        let flat: Vec<_> = (1..=5).map(|d| entry(&format!("2024-01-0{}", d), 5)).collect();
        let mild: Vec<_> = [4, 5, 6, 5, 5]
            .iter()
            .enumerate()
            .map(|(i, v)| entry(&format!("2024-01-0{}", i + 1), *v))
            .collect();
        let wild: Vec<_> = [1, 10, 1, 10, 5]
            .iter()
            .enumerate()
            .map(|(i, v)| entry(&format!("2024-01-0{}", i + 1), *v))
            .collect();

        let s_flat = mood_stability(&flat, 5);
        let s_mild = mood_stability(&mild, 5);
        let s_wild = mood_stability(&wild, 5);
        assert_eq!(s_flat, 100.0);
        assert!(s_flat > s_mild && s_mild > s_wild);
        assert!((0.0..=100.0).contains(&s_wild));
    }

    #[test]
    fn test_stability_clamped_at_zero() {
        let extreme: Vec<_> = [1, 10, 1, 10, 1, 10]
            .iter()
            .enumerate()
            .map(|(i, v)| entry(&format!("2024-01-0{}", i + 1), *v))
            .collect();
        // sigma = 4.5 -> 100 - 90 = 10
        assert!((mood_stability(&extreme, 5) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations_all_triggered() {
        let entries: Vec<_> = (1..=3)
            .map(|d| {
                EntryBuilder::new(&format!("2024-01-0{}", d))
                    .intensity(2)
                    .energy(1)
                    .build()
            })
            .collect();
        let recs = recommendations(&entries, &Streaks::default());
        assert_eq!(
            recs,
            vec![
                "Consider incorporating more physical activity or ensuring adequate rest",
                "Try practicing gratitude or mindfulness exercises",
                "Regular journaling could help you process emotions better",
                "Try to maintain consistent daily mood tracking",
            ]
        );
    }

    #[test]
    fn test_declining_trends_yield_predictions() {
        let mut entries = Vec::new();
        for d in 1..=6 {
            entries.push(
                EntryBuilder::new(&format!("2024-02-{:02}", d))
                    .intensity(8)
                    .energy(5)
                    .build(),
            );
        }
        for d in 7..=12 {
            entries.push(
                EntryBuilder::new(&format!("2024-02-{:02}", d))
                    .intensity(3)
                    .energy(2)
                    .build(),
            );
        }
        // shuffled input still windows by date
        entries.reverse();

        let insights = InsightEngine::new()
            .compute(&entries, day("2024-02-12"))
            .unwrap();
        assert_eq!(insights.mood_trend, Trend::Declining);
        assert_eq!(insights.energy_trend, Trend::Declining);
        assert_eq!(
            insights.predictions,
            vec![
                "Consider focusing on self-care activities this week",
                "Your energy levels may benefit from more rest or exercise",
            ]
        );
    }

    #[test]
    fn test_custom_pattern_registration() {
        struct Always;
        impl Pattern for Always {
            fn kind(&self) -> PatternKind {
                PatternKind::Trigger
            }
            fn detect(&self, _entries: &[MoodEntry]) -> Option<String> {
                Some("always".to_string())
            }
        }

        let mut engine = InsightEngine::new();
        for _ in 0..5 {
            engine.register(Box::new(Always));
        }
        let insights = engine
            .compute(&[entry("2024-01-03", 5)], day("2024-01-03"))
            .unwrap();
        assert_eq!(insights.patterns.len(), MAX_PATTERNS);
    }
}
