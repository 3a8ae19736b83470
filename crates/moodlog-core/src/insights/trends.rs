//! Recent-vs-previous window trends

use crate::models::MoodEntry;

use super::stats::mean;
use super::types::Trend;

/// Classify the last `window` values against the `window` before them
///
/// `values` must already be in chronological order. Fewer than `window`
/// values, or no earlier window to compare against, is `Stable`.
pub fn windowed_trend(values: &[f64], window: usize, delta: f64) -> Trend {
    if window == 0 || values.len() < window {
        return Trend::Stable;
    }

    let split = values.len() - window;
    let recent = &values[split..];
    let older = &values[split.saturating_sub(window)..split];

    let (Some(recent_avg), Some(older_avg)) = (mean(recent), mean(older)) else {
        return Trend::Stable;
    };

    if recent_avg > older_avg + delta {
        Trend::Improving
    } else if recent_avg < older_avg - delta {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Intensity trend over entries already sorted chronologically
pub fn mood_trend(sorted: &[MoodEntry], window: usize, delta: f64) -> Trend {
    let values: Vec<f64> = sorted
        .iter()
        .map(|e| f64::from(e.effective_intensity()))
        .collect();
    windowed_trend(&values, window, delta)
}

/// Energy trend over entries already sorted chronologically
pub fn energy_trend(sorted: &[MoodEntry], window: usize, delta: f64) -> Trend {
    let values: Vec<f64> = sorted
        .iter()
        .map(|e| f64::from(e.effective_energy()))
        .collect();
    windowed_trend(&values, window, delta)
}
