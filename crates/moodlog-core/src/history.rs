//! History browsing: search, period filter, and sort

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::MoodEntry;

/// Calendar period relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    All,
    Today,
    /// Sunday through Saturday of the current week
    Week,
    /// The current calendar month
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Inclusive date bounds, `None` for `All`
    pub fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Period::All => None,
            Period::Today => Some((today, today)),
            Period::Week => {
                let start =
                    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
                Some((start, start + Duration::days(6)))
            }
            Period::Month => {
                let start = today.with_day(1)?;
                let next = start.checked_add_months(chrono::Months::new(1))?;
                Some((start, next - Duration::days(1)))
            }
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.bounds(today) {
            Some((start, end)) => date >= start && date <= end,
            None => true,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "today" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            _ => Err(format!("Unknown period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "oldest" => Ok(SortOrder::Asc),
            "desc" | "newest" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Filters for browsing the history
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Case-insensitive substring to look for
    pub search: Option<String>,
    pub period: Period,
    pub order: SortOrder,
}

impl HistoryQuery {
    /// Whether `entry` matches the search term
    ///
    /// Looks at the reflection, mood labels, triggers, and image insights.
    pub fn matches_search(&self, entry: &MoodEntry) -> bool {
        let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        let hit = |text: &str| text.to_lowercase().contains(&term);

        hit(&entry.reflection)
            || entry.moods.iter().any(|m| hit(&m.label))
            || entry.triggers.iter().any(|t| hit(t))
            || entry
                .image_analysis
                .as_ref()
                .is_some_and(|a| a.insights.iter().any(|i| hit(i)))
    }

    /// Apply the query, returning matching entries in the requested order
    pub fn apply(&self, entries: &[MoodEntry], today: NaiveDate) -> Vec<MoodEntry> {
        let mut out: Vec<MoodEntry> = entries
            .iter()
            .filter(|e| self.matches_search(e))
            .filter(|e| self.period.contains(e.date, today))
            .cloned()
            .collect();

        out.sort_by(|a, b| {
            let ord = a.date.cmp(&b.date).then(a.timestamp.cmp(&b.timestamp));
            match self.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageAnalysis;
    use crate::test_utils::{day, sample_journal, EntryBuilder};

    #[test]
    fn test_week_bounds_sunday_to_saturday() {
        // 2024-01-17 is a Wednesday
        let (start, end) = Period::Week.bounds(day("2024-01-17")).unwrap();
        assert_eq!(start, day("2024-01-14"));
        assert_eq!(end, day("2024-01-20"));

        // Sunday starts its own week
        let (start, _) = Period::Week.bounds(day("2024-01-14")).unwrap();
        assert_eq!(start, day("2024-01-14"));
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = Period::Month.bounds(day("2024-02-10")).unwrap();
        assert_eq!(start, day("2024-02-01"));
        assert_eq!(end, day("2024-02-29"));
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let result = HistoryQuery::default().apply(&sample_journal(), day("2024-01-15"));
        assert_eq!(result.len(), 6);
        assert_eq!(result[0].date, day("2024-01-15"));
        assert_eq!(result[5].date, day("2024-01-10"));
    }

    #[test]
    fn test_search_fields() {
        let entries = sample_journal();
        let query = |term: &str| HistoryQuery {
            search: Some(term.to_string()),
            ..Default::default()
        };

        // reflection
        assert_eq!(query("PROMOTED").apply(&entries, day("2024-01-15")).len(), 1);
        // mood label
        assert_eq!(query("peaceful").apply(&entries, day("2024-01-15")).len(), 2);
        // trigger
        assert_eq!(query("work/career").apply(&entries, day("2024-01-15")).len(), 3);

        let mut with_image = EntryBuilder::new("2024-01-20").build();
        with_image.image_analysis = Some(ImageAnalysis {
            suggested_moods: vec![],
            confidence: 0.7,
            insights: vec!["Blue tones suggest calmness and tranquility".to_string()],
            colors: vec![],
            objects: vec![],
            emotions: vec![],
        });
        assert!(query("tranquil").matches_search(&with_image));
    }

    #[test]
    fn test_period_and_order() {
        let query = HistoryQuery {
            search: None,
            period: Period::Week,
            order: SortOrder::Asc,
        };
        // week of 2024-01-14 (Sun) .. 2024-01-20 (Sat)
        let result = query.apply(&sample_journal(), day("2024-01-16"));
        let dates: Vec<_> = result.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day("2024-01-14"), day("2024-01-15")]);

        let today_only = HistoryQuery {
            period: Period::Today,
            ..Default::default()
        };
        assert_eq!(today_only.apply(&sample_journal(), day("2024-01-12")).len(), 1);
    }
}
