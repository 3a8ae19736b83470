//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Mood;

/// Direction of a windowed average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "improving" => Ok(Trend::Improving),
            "declining" => Ok(Trend::Declining),
            "stable" => Ok(Trend::Stable),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

/// Kinds of behavioral pattern the engine can detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Weekend vs weekday intensity gap
    Weekend,
    /// Sleep quality tracks intensity
    SleepCorrelation,
    /// A trigger that coincides with high intensity
    Trigger,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Weekend => "weekend",
            PatternKind::SleepCorrelation => "sleep_correlation",
            PatternKind::Trigger => "trigger",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekend" => Ok(PatternKind::Weekend),
            "sleep_correlation" => Ok(PatternKind::SleepCorrelation),
            "trigger" => Ok(PatternKind::Trigger),
            _ => Err(format!("Unknown pattern kind: {}", s)),
        }
    }
}

/// Consecutive-day logging runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streaks {
    /// Run ending today (0 when today has no entry)
    pub current: u32,
    /// Longest run anywhere in the history
    pub longest: u32,
}

/// Occurrences of one catalog mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodCount {
    pub mood: Mood,
    pub count: usize,
}

/// Derived view of an entry history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// At most 4 pattern sentences
    pub patterns: Vec<String>,
    /// At most 3 prediction sentences
    pub predictions: Vec<String>,
    /// At most 4 recommendation sentences
    pub recommendations: Vec<String>,
    pub streaks: Streaks,
    /// 0-100, higher means steadier intensity
    pub mood_stability: f64,
    pub mood_trend: Trend,
    pub energy_trend: Trend,
    /// Catalog order, zero counts omitted
    pub mood_distribution: Vec<MoodCount>,
    pub total_entries: usize,
}

impl Insights {
    /// Stability as shown to users (whole percent)
    pub fn stability_percent(&self) -> u32 {
        self.mood_stability.round() as u32
    }
}
