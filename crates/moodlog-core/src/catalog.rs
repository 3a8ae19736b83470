//! Fixed catalogs: moods, triggers, and energy levels

use serde::{Deserialize, Serialize};

use crate::models::Mood;

/// The ten selectable moods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodKind {
    VeryHappy,
    Happy,
    Neutral,
    Sad,
    VerySad,
    Anxious,
    Angry,
    Tired,
    Grateful,
    Peaceful,
}

impl MoodKind {
    /// All moods in catalog order
    pub fn all() -> &'static [MoodKind] {
        &[
            Self::VeryHappy,
            Self::Happy,
            Self::Neutral,
            Self::Sad,
            Self::VerySad,
            Self::Anxious,
            Self::Angry,
            Self::Tired,
            Self::Grateful,
            Self::Peaceful,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHappy => "Very Happy",
            Self::Happy => "Happy",
            Self::Neutral => "Neutral",
            Self::Sad => "Sad",
            Self::VerySad => "Very Sad",
            Self::Anxious => "Anxious",
            Self::Angry => "Angry",
            Self::Tired => "Tired",
            Self::Grateful => "Grateful",
            Self::Peaceful => "Peaceful",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::VeryHappy => "😄",
            Self::Happy => "🙂",
            Self::Neutral => "😐",
            Self::Sad => "😔",
            Self::VerySad => "😢",
            Self::Anxious => "😰",
            Self::Angry => "😡",
            Self::Tired => "😴",
            Self::Grateful => "🤗",
            Self::Peaceful => "😌",
        }
    }

    /// Intensity class from 1 (very negative) to 5 (very positive)
    pub fn value(&self) -> u8 {
        match self {
            Self::VeryHappy => 5,
            Self::Happy | Self::Grateful | Self::Peaceful => 4,
            Self::Neutral => 3,
            Self::Sad | Self::Anxious | Self::Angry | Self::Tired => 2,
            Self::VerySad => 1,
        }
    }

    /// Display color classes
    pub fn color(&self) -> &'static str {
        match self {
            Self::VeryHappy => {
                "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-200"
            }
            Self::Happy => "bg-blue-100 text-blue-800 dark:bg-blue-900 dark:text-blue-200",
            Self::Neutral => "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-200",
            Self::Sad => {
                "bg-orange-100 text-orange-800 dark:bg-orange-900 dark:text-orange-200"
            }
            Self::VerySad | Self::Angry => {
                "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-200"
            }
            Self::Anxious => {
                "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-200"
            }
            Self::Tired => {
                "bg-purple-100 text-purple-800 dark:bg-purple-900 dark:text-purple-200"
            }
            Self::Grateful => "bg-pink-100 text-pink-800 dark:bg-pink-900 dark:text-pink-200",
            Self::Peaceful => "bg-teal-100 text-teal-800 dark:bg-teal-900 dark:text-teal-200",
        }
    }

    /// Build the stored representation of this mood
    pub fn to_mood(&self) -> Mood {
        Mood {
            emoji: self.emoji().to_string(),
            label: self.label().to_string(),
            value: self.value(),
            color: self.color().to_string(),
        }
    }

    /// Look up a catalog mood by its display label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::str::FromStr for MoodKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', '_'], " ");
        Self::from_label(&normalized).ok_or_else(|| format!("Unknown mood: {}", s))
    }
}

impl std::fmt::Display for MoodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Triggers offered for selection; free text is also accepted
pub const TRIGGERS: [&str; 12] = [
    "Work/Career",
    "Relationships",
    "Health",
    "Family",
    "Money",
    "Weather",
    "Sleep",
    "Exercise",
    "Social",
    "Achievement",
    "Stress",
    "Other",
];

/// Named energy levels, indexed by `value - 1`
pub const ENERGY_LEVELS: [(u8, &str); 5] = [
    (1, "Exhausted"),
    (2, "Low"),
    (3, "Moderate"),
    (4, "High"),
    (5, "Energized"),
];

/// Label for an energy value, if it is in range
pub fn energy_label(value: u8) -> Option<&'static str> {
    ENERGY_LEVELS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
}
