//! Test utilities for moodlog-core
//!
//! Entry builders and a small sample journal shared by unit tests,
//! integration tests, and the CLI tests (via the `test-utils` feature).

use chrono::NaiveDate;

use crate::catalog::MoodKind;
use crate::models::MoodEntry;

/// Parse a `YYYY-MM-DD` literal
pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date literal")
}

/// Epoch millis at midnight UTC of `date`
pub fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
        .and_utc()
        .timestamp_millis()
}

/// Builder for entries in tests
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    entry: MoodEntry,
}

impl EntryBuilder {
    /// A neutral entry on `date` with intensity 5 and energy 3
    pub fn new(date: &str) -> Self {
        let date = day(date);
        Self {
            entry: MoodEntry {
                id: format!("entry-{}", date),
                date,
                moods: vec![MoodKind::Neutral.to_mood()],
                intensity: 5,
                energy: 3,
                sleep_quality: None,
                reflection: String::new(),
                triggers: vec![],
                image: None,
                image_analysis: None,
                audio_note: None,
                timestamp: midnight_millis(date),
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.entry.id = id.to_string();
        self
    }

    pub fn moods(mut self, kinds: &[MoodKind]) -> Self {
        self.entry.moods = kinds.iter().map(|k| k.to_mood()).collect();
        self
    }

    pub fn intensity(mut self, intensity: u8) -> Self {
        self.entry.intensity = intensity;
        self
    }

    pub fn energy(mut self, energy: u8) -> Self {
        self.entry.energy = energy;
        self
    }

    pub fn sleep(mut self, sleep: u8) -> Self {
        self.entry.sleep_quality = Some(sleep);
        self
    }

    pub fn reflection(mut self, text: &str) -> Self {
        self.entry.reflection = text.to_string();
        self
    }

    pub fn triggers(mut self, triggers: &[&str]) -> Self {
        self.entry.triggers = triggers.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn timestamp(mut self, millis: i64) -> Self {
        self.entry.timestamp = millis;
        self
    }

    pub fn build(self) -> MoodEntry {
        self.entry
    }
}

/// Shorthand for an entry with only date and intensity set
pub fn entry(date: &str, intensity: u8) -> MoodEntry {
    EntryBuilder::new(date).intensity(intensity).build()
}

/// Six days of sample journal data (2024-01-10 through 2024-01-15)
pub fn sample_journal() -> Vec<MoodEntry> {
    use MoodKind::*;

    vec![
        EntryBuilder::new("2024-01-15")
            .id("1")
            .moods(&[VeryHappy, Grateful])
            .intensity(8)
            .energy(4)
            .sleep(4)
            .reflection("Had an amazing day at work! Got promoted and celebrated with friends.")
            .triggers(&["Work/Career", "Achievement", "Social"])
            .build(),
        EntryBuilder::new("2024-01-14")
            .id("2")
            .moods(&[Happy, Peaceful])
            .intensity(6)
            .energy(3)
            .sleep(5)
            .reflection("Spent quality time with family. We went for a nice walk in the park.")
            .triggers(&["Family", "Exercise"])
            .build(),
        EntryBuilder::new("2024-01-13")
            .id("3")
            .moods(&[Neutral, Tired])
            .intensity(4)
            .energy(2)
            .sleep(2)
            .reflection("Regular day at work. Sometimes neutral is perfectly fine.")
            .triggers(&["Work/Career", "Sleep"])
            .build(),
        EntryBuilder::new("2024-01-12")
            .id("4")
            .moods(&[Sad, Anxious])
            .intensity(7)
            .energy(2)
            .sleep(2)
            .reflection("Feeling overwhelmed with deadlines and some conflicts at work.")
            .triggers(&["Work/Career", "Stress"])
            .build(),
        EntryBuilder::new("2024-01-11")
            .id("5")
            .moods(&[Happy, Peaceful])
            .intensity(6)
            .energy(4)
            .sleep(4)
            .reflection("Started reading a new book and had a great workout session.")
            .triggers(&["Exercise", "Achievement"])
            .build(),
        EntryBuilder::new("2024-01-10")
            .id("6")
            .moods(&[Angry, Sad])
            .intensity(8)
            .energy(3)
            .sleep(3)
            .reflection("Had a frustrating argument with a close friend over something trivial.")
            .triggers(&["Relationships", "Social"])
            .build(),
    ]
}
