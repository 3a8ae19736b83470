//! Insight Engine - derived analytics over the mood history
//!
//! Everything here is a pure recomputation over an entry list: nothing is
//! cached and inputs are never modified. Call it whenever the history changes.
//!
//! ## Outputs
//!
//! - **Patterns** - weekend vs weekday, sleep correlation, uplifting triggers
//! - **Trends** - recent intensity and energy compared with the window before
//! - **Streaks** - current and longest runs of logged days
//! - **Stability** - spread of intensity as a 0-100 score
//! - **Summary** - period report with goal progress and overview sentences
//!
//! ## Usage
//!
//! ```rust,ignore
//! use moodlog_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! if let Some(insights) = engine.compute(&entries, today) {
//!     println!("Stability: {}%", insights.stability_percent());
//! }
//! ```

pub mod engine;
pub mod patterns;
pub mod stats;
pub mod streaks;
pub mod summary;
pub mod trends;
pub mod types;

pub use engine::{mood_distribution, mood_stability, recommendations, InsightEngine};
pub use patterns::{
    most_positive_trigger, sleep_mood_correlation, weekend_vs_weekday, Pattern,
    SleepCorrelationPattern, TriggerPattern, WeekendPattern,
};
pub use streaks::{current_streak, longest_streak};
pub use summary::{
    summarize, trigger_frequency, GoalProgress, IntensityEnergyPoint, SleepMoodPoint,
    SummaryReport, TimeRange, TriggerCount,
};
pub use types::{Insights, MoodCount, PatternKind, Streaks, Trend};
