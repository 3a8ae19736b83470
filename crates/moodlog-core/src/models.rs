//! Domain models for Moodlog

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::MoodKind;

/// Intensity substituted when an entry carries no usable value
pub const DEFAULT_INTENSITY: u8 = 5;
/// Energy substituted when an entry carries no usable value
pub const DEFAULT_ENERGY: u8 = 3;

/// A mood as stored on an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub emoji: String,
    pub label: String,
    /// Intensity class, 1 (very negative) to 5 (very positive)
    pub value: u8,
    pub color: String,
}

impl Mood {
    /// Two moods are the same selection when label and value match
    pub fn same_selection(&self, other: &Mood) -> bool {
        self.label == other.label && self.value == other.value
    }

    /// Resolve the catalog mood this selection refers to
    pub fn kind(&self) -> Option<MoodKind> {
        MoodKind::from_label(&self.label)
    }
}

impl From<MoodKind> for Mood {
    fn from(kind: MoodKind) -> Self {
        kind.to_mood()
    }
}

/// Result of the image mood analyzer, attached to an entry at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    /// At most 4 distinct mood words
    pub suggested_moods: Vec<String>,
    /// Self-reported certainty in [0, 1]
    pub confidence: f64,
    /// At most 3 sentences
    pub insights: Vec<String>,
    /// Dominant colors as hex strings
    pub colors: Vec<String>,
    /// Detected scene tags
    pub objects: Vec<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
}

/// One day's mood-logging record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub moods: Vec<Mood>,
    /// Self-reported severity, 1-10
    #[serde(default)]
    pub intensity: u8,
    /// Self-reported energy, 1-5
    #[serde(default)]
    pub energy: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<u8>,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Embedded image as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<ImageAnalysis>,
    /// Reference to a recorded voice clip; not guaranteed to resolve later
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_note: Option<String>,
    /// Creation instant in epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
}

impl MoodEntry {
    /// Intensity with out-of-range values replaced by the default
    pub fn effective_intensity(&self) -> u8 {
        if (1..=10).contains(&self.intensity) {
            self.intensity
        } else {
            DEFAULT_INTENSITY
        }
    }

    /// Energy with out-of-range values replaced by the default
    pub fn effective_energy(&self) -> u8 {
        if (1..=5).contains(&self.energy) {
            self.energy
        } else {
            DEFAULT_ENERGY
        }
    }

    /// Sleep quality if present and usable
    pub fn effective_sleep(&self) -> Option<u8> {
        self.sleep_quality.filter(|s| (1..=5).contains(s))
    }

    /// Whether the reflection counts as a written journal entry
    pub fn has_reflection(&self) -> bool {
        self.reflection.chars().count() > 10
    }

    /// Mean catalog value of the selected moods (3 when none are selected)
    pub fn average_mood_value(&self) -> f64 {
        if self.moods.is_empty() {
            return 3.0;
        }
        let total: u32 = self.moods.iter().map(|m| u32::from(m.value)).sum();
        f64::from(total) / self.moods.len() as f64
    }

    pub fn has_mood(&self, kind: MoodKind) -> bool {
        self.moods.iter().any(|m| m.label == kind.label())
    }
}

/// Sort entries chronologically, using the creation timestamp to break ties
pub fn sort_chronologically(entries: &mut [MoodEntry]) {
    entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.timestamp.cmp(&b.timestamp)));
}

/// Input for creating a new entry
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub moods: Vec<MoodKind>,
    pub intensity: u8,
    pub energy: u8,
    pub sleep_quality: Option<u8>,
    pub reflection: String,
    pub triggers: Vec<String>,
    pub image: Option<String>,
    pub image_analysis: Option<ImageAnalysis>,
    pub audio_note: Option<String>,
}

impl EntryDraft {
    /// A draft for `date` with the composer's default sliders
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            moods: vec![],
            intensity: DEFAULT_INTENSITY,
            energy: DEFAULT_ENERGY,
            sleep_quality: None,
            reflection: String::new(),
            triggers: vec![],
            image: None,
            image_analysis: None,
            audio_note: None,
        }
    }

    /// Toggle a mood on or off, preserving selection order
    pub fn toggle_mood(&mut self, kind: MoodKind) {
        if let Some(pos) = self.moods.iter().position(|m| *m == kind) {
            self.moods.remove(pos);
        } else {
            self.moods.push(kind);
        }
    }

    /// Toggle a trigger on or off, preserving selection order
    pub fn toggle_trigger(&mut self, trigger: &str) {
        if let Some(pos) = self.triggers.iter().position(|t| t == trigger) {
            self.triggers.remove(pos);
        } else {
            self.triggers.push(trigger.to_string());
        }
    }

    /// Materialize the draft into an entry without validating it
    pub fn into_entry(self, id: String, created_at: DateTime<Utc>) -> MoodEntry {
        let mut moods: Vec<Mood> = Vec::with_capacity(self.moods.len());
        for kind in self.moods {
            let mood = kind.to_mood();
            if !moods.iter().any(|m| m.same_selection(&mood)) {
                moods.push(mood);
            }
        }

        MoodEntry {
            id,
            date: self.date,
            moods,
            intensity: self.intensity,
            energy: self.energy,
            sleep_quality: self.sleep_quality,
            reflection: self.reflection,
            triggers: self.triggers,
            image: self.image,
            image_analysis: self.image_analysis,
            audio_note: self.audio_note,
            timestamp: created_at.timestamp_millis(),
        }
    }
}

/// Fields that may be changed on an existing entry
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub reflection: Option<String>,
    pub intensity: Option<u8>,
    pub energy: Option<u8>,
}

impl EntryEdit {
    pub fn is_empty(&self) -> bool {
        self.reflection.is_none() && self.intensity.is_none() && self.energy.is_none()
    }

    /// Apply the edit, returning the replacement entry
    pub fn apply(&self, entry: &MoodEntry) -> MoodEntry {
        let mut updated = entry.clone();
        if let Some(ref reflection) = self.reflection {
            updated.reflection = reflection.clone();
        }
        if let Some(intensity) = self.intensity {
            updated.intensity = intensity;
        }
        if let Some(energy) = self.energy {
            updated.energy = energy;
        }
        updated
    }
}
