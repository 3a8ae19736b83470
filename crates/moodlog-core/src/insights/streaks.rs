//! Consecutive-day logging streaks

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::models::MoodEntry;

use super::types::Streaks;

fn logged_days(entries: &[MoodEntry]) -> BTreeSet<NaiveDate> {
    entries.iter().map(|e| e.date).collect()
}

/// Longest run of consecutive calendar days with an entry
///
/// Several entries on one day count once.
pub fn longest_streak(entries: &[MoodEntry]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in logged_days(entries) {
        run = match previous {
            Some(prev) if date - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    longest
}

/// Days logged in a row ending today
///
/// 0 when today has no entry. Counts today plus at most `lookback - 1`
/// earlier days.
pub fn current_streak(entries: &[MoodEntry], today: NaiveDate, lookback: u32) -> u32 {
    let days = logged_days(entries);
    if !days.contains(&today) {
        return 0;
    }

    let mut current = 1;
    for offset in 1..lookback {
        let day = today - Duration::days(i64::from(offset));
        if !days.contains(&day) {
            break;
        }
        current += 1;
    }
    current
}

pub fn streaks(entries: &[MoodEntry], today: NaiveDate, lookback: u32) -> Streaks {
    Streaks {
        current: current_streak(entries, today, lookback),
        longest: longest_streak(entries),
    }
}
